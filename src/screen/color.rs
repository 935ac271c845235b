//! RGB colors and the distance metric used by checkpoints.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color.
///
/// Serialized as a `[r, g, b]` array so layout files stay compact. Values
/// outside 0-255 fail deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self { red, green, blue }
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        [color.red, color.green, color.blue]
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(pixel: image::Rgb<u8>) -> Self {
        Self::from(pixel.0)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}

/// Cumulative absolute difference between the channels of two colors (0..=765).
pub fn color_delta(a: Color, b: Color) -> u32 {
    a.red.abs_diff(b.red) as u32 + a.green.abs_diff(b.green) as u32 + a.blue.abs_diff(b.blue) as u32
}
