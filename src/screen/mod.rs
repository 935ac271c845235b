//! Pixel-probe screen recognition.
//!
//! This module provides:
//! - Colors and the cumulative channel delta (`color_delta`)
//! - Screen geometry (`Pixel`, `Bounds`, `Section`)
//! - Single-pixel color probes (`Checkpoint`)
//! - Strict and threshold screen detection (`detect_screen`)

pub mod checkpoint;
pub mod color;
pub mod detector;
pub mod geometry;

pub use checkpoint::Checkpoint;
pub use color::Color;
pub use detector::{detect_screen, ScreenDefinition};
pub use geometry::{Bounds, Section};
