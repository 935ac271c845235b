//! Screen presence detection.
//!
//! A screen is "showing" when enough of its checkpoints match. Strict mode
//! requires every checkpoint; threshold mode tolerates a few occluded probes.

use log::debug;
use serde::{Deserialize, Serialize};

use super::checkpoint::Checkpoint;
use super::geometry::Section;
use crate::capture::ScreenSource;

/// One recognizable UI screen: its color probes and its text regions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenDefinition {
    pub checkpoints: Vec<Checkpoint>,
    #[serde(default)]
    pub locations: Vec<Section>,
    /// Minimum number of matching checkpoints; `None` requires all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_threshold: Option<usize>,
}

impl ScreenDefinition {
    pub fn new(checkpoints: Vec<Checkpoint>, locations: Vec<Section>) -> Self {
        Self {
            checkpoints,
            locations,
            test_threshold: None,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.test_threshold = Some(threshold);
        self
    }
}

/// Decision rule shared by both modes.
pub fn screen_present(matched: usize, total: usize, test_threshold: Option<usize>) -> bool {
    match test_threshold {
        Some(threshold) => matched >= threshold,
        None => matched == total,
    }
}

/// Counts the checkpoints currently matching, logging misses in debug mode.
pub fn count_matching(screen: &dyn ScreenSource, checkpoints: &[Checkpoint], debug: bool) -> usize {
    checkpoints
        .iter()
        .filter(|checkpoint| {
            let passed = checkpoint.test(screen);
            if !passed && debug {
                debug!("Checkpoint failed: {}", checkpoint);
            }
            passed
        })
        .count()
}

/// Returns true if the screen described by `definition` is currently displayed.
pub fn detect_screen(
    screen: &dyn ScreenSource,
    definition: &ScreenDefinition,
    test_threshold: Option<usize>,
    debug: bool,
) -> bool {
    let matched = count_matching(screen, &definition.checkpoints, debug);
    screen_present(matched, definition.checkpoints.len(), test_threshold)
}
