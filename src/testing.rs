//! Test doubles for the display, OCR and prompt seams.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use anyhow::{anyhow, Result};
use image::{imageops, Rgb, RgbImage};

use crate::automation::prompt::ResultPrompt;
use crate::capture::ScreenSource;
use crate::history::MatchResult;
use crate::ocr::TextRecognizer;
use crate::screen::geometry::Pixel;
use crate::screen::{Bounds, Checkpoint, Color, ScreenDefinition};

/// An in-memory frame standing in for the live display.
pub struct FakeScreen {
    frame: RefCell<RgbImage>,
    grabs: Cell<usize>,
}

impl FakeScreen {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: RefCell::new(RgbImage::new(width, height)),
            grabs: Cell::new(0),
        }
    }

    pub fn paint(&self, pixel: Pixel, color: Color) {
        self.frame
            .borrow_mut()
            .put_pixel(pixel.x, pixel.y, Rgb(color.into()));
    }

    /// Paints every checkpoint of a screen with its expected color.
    pub fn show(&self, definition: &ScreenDefinition) {
        for checkpoint in &definition.checkpoints {
            self.paint_checkpoint(checkpoint);
        }
    }

    pub fn paint_checkpoint(&self, checkpoint: &Checkpoint) {
        self.paint(checkpoint.probe_pixel(), checkpoint.probe.color);
    }

    pub fn grabs(&self) -> usize {
        self.grabs.get()
    }
}

impl ScreenSource for FakeScreen {
    fn grab(&self, bounds: &Bounds) -> Option<RgbImage> {
        self.grabs.set(self.grabs.get() + 1);
        let frame = self.frame.borrow();
        let end = bounds.end();
        if end.x > frame.width() || end.y > frame.height() {
            return None;
        }
        let start = bounds.start();
        let region = imageops::crop_imm(&*frame, start.x, start.y, bounds.width(), bounds.height());
        Some(region.to_image())
    }
}

/// A display that is never available.
pub struct FailingScreen;

impl ScreenSource for FailingScreen {
    fn grab(&self, _bounds: &Bounds) -> Option<RgbImage> {
        None
    }
}

/// OCR engine replaying canned responses; returns "" once exhausted.
///
/// A response of `Err(..)` simulates an engine failure.
#[derive(Default)]
pub struct ScriptedOcr {
    responses: RefCell<VecDeque<Result<String, String>>>,
    psms: RefCell<Vec<u8>>,
}

impl ScriptedOcr {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(|s| Ok(s.into())).collect()),
            psms: RefCell::new(Vec::new()),
        }
    }

    pub fn push(&self, text: &str) {
        self.responses.borrow_mut().push_back(Ok(text.to_string()));
    }

    pub fn push_failure(&self, message: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(message.to_string()));
    }

    /// Page segmentation modes requested so far, in call order.
    pub fn psms(&self) -> Vec<u8> {
        self.psms.borrow().clone()
    }
}

impl TextRecognizer for ScriptedOcr {
    fn recognize(&self, _image: &RgbImage, psm: u8) -> Result<String> {
        self.psms.borrow_mut().push(psm);
        match self.responses.borrow_mut().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(String::new()),
        }
    }
}

/// Prompt that always answers with the same result.
pub struct FixedPrompt {
    answer: MatchResult,
    asked: Cell<usize>,
}

impl FixedPrompt {
    pub fn new(answer: MatchResult) -> Self {
        Self {
            answer,
            asked: Cell::new(0),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.get()
    }
}

impl ResultPrompt for FixedPrompt {
    fn ask_result(&self) -> Result<MatchResult> {
        self.asked.set(self.asked.get() + 1);
        Ok(self.answer)
    }
}
