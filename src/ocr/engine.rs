use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use log::info;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::{find_tessdata_dir, find_tesseract_executable, tesseract_version};

/// Page segmentation mode used when none is requested ("fully automatic").
pub const DEFAULT_PSM: u8 = 3;

/// Something that turns an image into text.
pub trait TextRecognizer {
    /// Recognizes the text in `image` using the given page segmentation mode.
    fn recognize(&self, image: &RgbImage, psm: u8) -> Result<String>;
}

/// Tesseract invoked as an external process.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    executable: PathBuf,
    tessdata: Option<PathBuf>,
}

impl TesseractEngine {
    /// Locates a working Tesseract, failing if none can be run.
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        let executable = find_tesseract_executable(configured)?;
        let version = tesseract_version(&executable)?;
        info!("Using {} ({})", executable.display(), version);

        Ok(Self {
            executable,
            tessdata: find_tessdata_dir(),
        })
    }
}

impl TextRecognizer for TesseractEngine {
    fn recognize(&self, image: &RgbImage, psm: u8) -> Result<String> {
        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        image
            .save(temp_input.path())
            .context("Failed to write OCR input image")?;

        let mut command = Command::new(&self.executable);
        command
            .arg(temp_input.path())
            .arg("stdout")
            .arg("-l")
            .arg("eng")
            .arg("--psm")
            .arg(psm.to_string());
        if let Some(tessdata) = &self.tessdata {
            command.arg("--tessdata-dir").arg(tessdata);
        }

        let output = command.output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
