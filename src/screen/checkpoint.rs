use serde::{Deserialize, Serialize};

use super::color::{color_delta, Color};
use super::geometry::{Pixel, Section};
use crate::capture::ScreenSource;

pub const DEFAULT_CHECKPOINT_THRESHOLD: u32 = 6;

fn default_threshold() -> u32 {
    DEFAULT_CHECKPOINT_THRESHOLD
}

/// Expected color of a probed pixel and how far the live color may drift from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorProbe {
    pub color: Color,
    /// Matches when the cumulative channel delta is strictly below this value.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
}

impl ColorProbe {
    pub fn matches(&self, sampled: Color) -> bool {
        color_delta(self.color, sampled) < self.threshold
    }
}

/// A single-pixel color probe at the center of a section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub section: Section,
    #[serde(flatten)]
    pub probe: ColorProbe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Checkpoint {
    pub fn new(section: Section, color: Color) -> Self {
        Self {
            section,
            probe: ColorProbe {
                color,
                threshold: DEFAULT_CHECKPOINT_THRESHOLD,
            },
            name: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Screen-space position of the probed pixel.
    pub fn probe_pixel(&self) -> Pixel {
        self.section.absolute(self.section.center())
    }

    /// Returns true when the live pixel is close enough to the expected color.
    ///
    /// A failed capture counts as a miss.
    pub fn test(&self, screen: &dyn ScreenSource) -> bool {
        self.section
            .sample_pixel(screen, self.section.center())
            .is_some_and(|sampled| self.probe.matches(sampled))
    }
}

impl std::fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pixel = self.probe_pixel();
        if let Some(name) = &self.name {
            write!(f, "{} ", name)?;
        }
        write!(f, "pixel [{}, {}], color {}", pixel.x, pixel.y, self.probe.color)
    }
}
