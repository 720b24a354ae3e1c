use std::io::Cursor;

use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat, ImageReader, Luma};

use crate::config::OcrConfig;
use crate::error::{PlateScanError, Result};

/// Decode uploaded bytes into pixels, guessing the format from the content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(PlateScanError::Decode("image is empty".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PlateScanError::Decode(format!("failed to read image: {e}")))?;

    if reader.format().is_none() {
        return Err(PlateScanError::Decode(
            "unrecognized image format".to_string(),
        ));
    }

    reader
        .decode()
        .map_err(|e| PlateScanError::Decode(e.to_string()))
}

/// Encode an image as PNG, the format handed to engines that take raw bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    img.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| PlateScanError::Internal(format!("Failed to encode image: {e}")))?;
    Ok(output)
}

/// Prepare a decoded image for recognition.
///
/// 1. Downscale so neither side exceeds `max_image_dimension`
/// 2. Convert to 8-bit grayscale, dropping any alpha channel
/// 3. Stretch the histogram to the full 0..=255 range
pub fn preprocess_image(img: DynamicImage, config: &OcrConfig) -> DynamicImage {
    let img = resize_if_needed(img, config.max_image_dimension);
    DynamicImage::ImageLuma8(stretch_contrast(img.to_luma8()))
}

/// Lanczos3 downscale preserving aspect ratio.
fn resize_if_needed(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();

    if max_dim == 0 || (width <= max_dim && height <= max_dim) {
        return img;
    }

    // `resize` fits within the bounds and keeps the aspect ratio.
    img.resize(max_dim, max_dim, image::imageops::FilterType::Lanczos3)
}

/// Map the darkest pixel to 0 and the lightest to 255.
fn stretch_contrast(mut gray: GrayImage) -> GrayImage {
    let (min_val, max_val) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), Luma([v])| {
            (lo.min(*v), hi.max(*v))
        });

    if max_val <= min_val {
        return gray;
    }

    let range = f32::from(max_val - min_val);
    for Luma([v]) in gray.pixels_mut() {
        *v = ((f32::from(*v - min_val) / range) * 255.0).round() as u8;
    }
    gray
}
