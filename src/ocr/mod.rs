//! Text extraction from screen sections.
//!
//! Captures are binarized (`preprocess`), handed to Tesseract (`engine`,
//! located by `setup`), and cleaned up into plain strings (`extract`).

pub mod engine;
pub mod extract;
pub mod preprocess;
pub mod setup;

pub use engine::{TesseractEngine, TextRecognizer};
pub use extract::{contains_characters, filter_characters, ExtractOptions, TextExtractor};
