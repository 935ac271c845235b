//! Primary-monitor capture using xcap.

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use log::{debug, info};
use xcap::Monitor;

use super::{crop_bounds, ScreenSource};
use crate::screen::Bounds;

/// Captures rectangles of the primary monitor.
///
/// Coordinates are relative to the monitor's top-left corner. Each grab takes
/// a fresh full-monitor capture and crops it; nothing is cached.
pub struct DisplayCapture {
    monitor: Monitor,
}

impl DisplayCapture {
    /// Locates the primary monitor and checks that it can be captured.
    pub fn primary() -> Result<Self> {
        let monitor = Monitor::all()
            .context("Failed to enumerate monitors")?
            .into_iter()
            .find(|m| m.is_primary())
            .ok_or_else(|| anyhow!("No primary monitor found"))?;

        let probe = monitor.capture_image().context(
            "Failed to capture the primary monitor. \
             On macOS, grant Screen Recording permission to the terminal",
        )?;
        info!(
            "Capturing monitor '{}' ({}x{})",
            monitor.name(),
            probe.width(),
            probe.height()
        );

        Ok(Self { monitor })
    }
}

impl ScreenSource for DisplayCapture {
    fn grab(&self, bounds: &Bounds) -> Option<RgbImage> {
        let frame = match self.monitor.capture_image() {
            Ok(frame) => frame,
            Err(e) => {
                debug!("Display capture failed: {}", e);
                return None;
            }
        };

        let region = crop_bounds(&frame, bounds);
        if region.is_none() {
            debug!(
                "Region {:?} lies outside the {}x{} display",
                <[u32; 4]>::from(*bounds),
                frame.width(),
                frame.height()
            );
        }
        region
    }
}
