//! Match tracking automation.
//!
//! This module provides:
//! - Configuration of screen layouts and polling intervals
//! - Queue banner matching
//! - The detection state machine and its runner
//! - The manual result prompt

pub mod config;
pub mod prompt;
pub mod queue;
pub mod runner;
pub mod state;

pub use config::load_config;
pub use prompt::StdinPrompt;
pub use runner::run_detection_loop;
pub use state::{DetectionContext, Services};
