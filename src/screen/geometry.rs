//! Screen-space coordinates and rectangular sections.

use anyhow::{bail, Result};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::color::Color;
use crate::capture::ScreenSource;

/// An (x, y) coordinate in screen space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
}

impl Pixel {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A rectangle given by its top-left `start` and bottom-right `end`.
///
/// Serialized as `[x0, y0, x1, y1]`; deserialization rejects rectangles
/// whose start lies past the end on either axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 4]", into = "[u32; 4]")]
pub struct Bounds {
    start: Pixel,
    end: Pixel,
}

impl Bounds {
    pub fn new(start: Pixel, end: Pixel) -> Result<Self> {
        if start.x > end.x || start.y > end.y {
            bail!(
                "invalid bounds: start ({}, {}) is past end ({}, {})",
                start.x,
                start.y,
                end.x,
                end.y
            );
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Pixel {
        self.start
    }

    pub fn end(&self) -> Pixel {
        self.end
    }

    pub fn width(&self) -> u32 {
        self.end.x - self.start.x
    }

    pub fn height(&self) -> u32 {
        self.end.y - self.start.y
    }
}

impl TryFrom<[u32; 4]> for Bounds {
    type Error = anyhow::Error;

    fn try_from([x0, y0, x1, y1]: [u32; 4]) -> Result<Self> {
        Bounds::new(Pixel::new(x0, y0), Pixel::new(x1, y1))
    }
}

impl From<Bounds> for [u32; 4] {
    fn from(bounds: Bounds) -> Self {
        [bounds.start.x, bounds.start.y, bounds.end.x, bounds.end.y]
    }
}

/// A rectangular region of the screen.
///
/// A section never holds on to pixels: every read performs a fresh capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section {
    bounds: Bounds,
}

impl Section {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    /// Convenience constructor from `[x0, y0, x1, y1]`.
    pub fn from_coords(coords: [u32; 4]) -> Result<Self> {
        Ok(Self::new(Bounds::try_from(coords)?))
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn width(&self) -> u32 {
        self.bounds.width()
    }

    pub fn height(&self) -> u32 {
        self.bounds.height()
    }

    /// Center of the section, relative to its top-left corner.
    pub fn center(&self) -> Pixel {
        Pixel::new(self.width() / 2, self.height() / 2)
    }

    /// Converts a section-relative coordinate to screen space.
    pub fn absolute(&self, relative: Pixel) -> Pixel {
        let start = self.bounds.start();
        Pixel::new(start.x + relative.x, start.y + relative.y)
    }

    /// Captures the section's current contents.
    pub fn grab(&self, screen: &dyn ScreenSource) -> Option<RgbImage> {
        screen.grab(&self.bounds)
    }

    /// Captures the section and reads the color at a section-relative coordinate.
    pub fn sample_pixel(&self, screen: &dyn ScreenSource, coordinate: Pixel) -> Option<Color> {
        let image = self.grab(screen)?;
        image
            .get_pixel_checked(coordinate.x, coordinate.y)
            .map(|pixel| Color::from(*pixel))
    }
}
