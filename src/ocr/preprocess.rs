use image::{imageops, Rgb, RgbImage};

/// Binarizes a captured region for OCR.
///
/// Any pixel that is not pure white has its red channel forced to 0, and the
/// red channel is then copied into all three channels. Pure white UI text
/// stays white; everything else, including anti-aliased edges and compressed
/// background art, goes black.
pub fn sanitize_image(img: &RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut output = RgbImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let red = if r != 255 || g != 255 || b != 255 { 0 } else { r };
        output.put_pixel(x, y, Rgb([red, red, red]));
    }

    output
}

/// Sanitizes and optionally inverts (dark text on white, as Tesseract prefers).
pub fn prepare_for_ocr(img: &RgbImage, use_inverted: bool) -> RgbImage {
    let mut processed = sanitize_image(img);
    if use_inverted {
        imageops::invert(&mut processed);
    }
    processed
}
