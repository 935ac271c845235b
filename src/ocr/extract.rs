use anyhow::{Context, Result};
use chrono::Local;
use image::{imageops, RgbImage};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use super::engine::{TextRecognizer, DEFAULT_PSM};
use super::preprocess::prepare_for_ocr;
use crate::capture::ScreenSource;
use crate::screen::Section;

/// How a batch of sections is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    pub lowercase: bool,
    pub use_inverted: bool,
    pub psm: u8,
}

impl ExtractOptions {
    pub fn new(lowercase: bool) -> Self {
        Self {
            lowercase,
            use_inverted: true,
            psm: DEFAULT_PSM,
        }
    }

    pub fn with_psm(mut self, psm: u8) -> Self {
        self.psm = psm;
        self
    }
}

/// Reads text out of screen sections.
pub struct TextExtractor<'a> {
    screen: &'a dyn ScreenSource,
    ocr: &'a dyn TextRecognizer,
    /// When set, every capture is saved here before OCR.
    debug_dir: Option<PathBuf>,
}

impl<'a> TextExtractor<'a> {
    pub fn new(screen: &'a dyn ScreenSource, ocr: &'a dyn TextRecognizer) -> Self {
        Self {
            screen,
            ocr,
            debug_dir: None,
        }
    }

    pub fn with_debug_dir(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }

    /// Returns the non-empty, trimmed text of each section, in order.
    ///
    /// Blank regions, failed captures and OCR errors are all dropped; they
    /// are routine while the game UI is animating.
    pub fn process_locations(&self, sections: &[Section], options: ExtractOptions) -> Vec<String> {
        let mut results = Vec::new();

        for section in sections {
            let Some(captured) = section.grab(self.screen) else {
                debug!("Capture failed for section {:?}", section.bounds());
                continue;
            };

            if let Some(dir) = &self.debug_dir {
                if let Err(e) = save_debug_images(&captured, dir) {
                    warn!("Could not save debug images: {:#}", e);
                }
            }

            let prepared = prepare_for_ocr(&captured, options.use_inverted);
            let raw = match self.ocr.recognize(&prepared, options.psm) {
                Ok(text) => text,
                Err(e) => {
                    warn!("OCR failed: {:#}", e);
                    continue;
                }
            };

            let mut text = raw.trim().to_string();
            if options.lowercase {
                text = text.to_lowercase();
            }
            if !text.is_empty() {
                results.push(text);
            }
        }

        results
    }
}

/// Saves the original and inverted capture as timestamped PNGs.
fn save_debug_images(captured: &RgbImage, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let suffix = Local::now().format("%Y-%m-%d-%H_%M_%S%.3f");
    let mut inverted = captured.clone();
    imageops::invert(&mut inverted);

    inverted.save(dir.join(format!("inverted-{}.png", suffix)))?;
    captured.save(dir.join(format!("original-{}.png", suffix)))?;
    debug!("Saved debug images to {}", dir.display());
    Ok(())
}

/// Keeps only the characters of `input` found in `allowed`, in order.
pub fn filter_characters(input: &str, allowed: &[char]) -> String {
    input.chars().filter(|c| allowed.contains(c)).collect()
}

/// True if every character in `required` occurs somewhere in `input`.
pub fn contains_characters(input: &str, required: &[char]) -> bool {
    required.iter().all(|c| input.contains(*c))
}
