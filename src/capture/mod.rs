//! Screen capture for the live game display.
//!
//! This module provides:
//! - The `ScreenSource` capability (rectangle → image)
//! - Primary-monitor capture via xcap (`DisplayCapture`)
//! - Bounds cropping shared by every source (`crop_bounds`)

pub mod display;

pub use display::DisplayCapture;

use image::{imageops, RgbImage, RgbaImage};

use crate::screen::Bounds;

/// Anything that can produce the current pixels of a screen rectangle.
///
/// Returns `None` when the display is unavailable or the rectangle lies
/// outside it; callers treat that as a transient miss.
pub trait ScreenSource {
    fn grab(&self, bounds: &Bounds) -> Option<RgbImage>;
}

/// Crops `bounds` out of a full-frame RGBA capture, dropping alpha.
///
/// Returns `None` if the rectangle does not fit inside the frame.
pub fn crop_bounds(frame: &RgbaImage, bounds: &Bounds) -> Option<RgbImage> {
    let (width, height) = frame.dimensions();
    let start = bounds.start();
    let end = bounds.end();
    if end.x > width || end.y > height {
        return None;
    }

    let region = imageops::crop_imm(frame, start.x, start.y, bounds.width(), bounds.height());
    Some(image::DynamicImage::ImageRgba8(region.to_image()).to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_crop_bounds() {
        let frame: RgbaImage =
            RgbaImage::from_fn(100, 200, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let bounds = Bounds::try_from([10, 50, 60, 70]).unwrap();

        let cropped = crop_bounds(&frame, &bounds).unwrap();
        assert_eq!(cropped.dimensions(), (50, 20));
        // Top-left pixel should be (10, 50) from original
        assert_eq!(cropped.get_pixel(0, 0).0, [10, 50, 0]);
    }

    #[test]
    fn test_crop_bounds_outside_frame() {
        let frame = RgbaImage::new(100, 100);
        let bounds = Bounds::try_from([90, 90, 150, 150]).unwrap();
        assert!(crop_bounds(&frame, &bounds).is_none());
    }
}
