//! Built-in encoders backed by the `image` crate.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{EncodedResult, OutputFormat};
use crate::bitmap::Bitmap;
use crate::error::{EngineError, Result};

/// Map a quality in `[0, 1]` to the JPEG encoder's `1..=100` scale.
///
/// Out-of-range and NaN inputs are clamped.
pub fn jpeg_quality(quality: f32) -> u8 {
    let scaled = (quality.clamp(0.0, 1.0) * 100.0).round();
    if scaled.is_nan() {
        return 1;
    }
    (scaled as u8).clamp(1, 100)
}

/// True when [`encode`] produces different output for different qualities.
///
/// Only JPEG does; PNG and WebP are always written losslessly.
#[inline]
pub fn honors_quality(format: OutputFormat) -> bool {
    matches!(format, OutputFormat::Jpeg)
}

/// Encode a bitmap.
///
/// `quality` is in `[0, 1]` and only affects JPEG. PNG and WebP are written
/// losslessly, so this function is a valid encoder for
/// [`compress_to_target`](crate::compress_to_target) for all three formats.
///
/// # Errors
///
/// Returns `EngineError::EncodingFailed` if the codec rejects the image.
pub fn encode(bitmap: &Bitmap, format: OutputFormat, quality: f32) -> Result<EncodedResult> {
    let mut buffer = Cursor::new(Vec::new());
    let (width, height) = bitmap.dimensions();
    let pixels = bitmap.pixels();

    let written = match format {
        OutputFormat::Jpeg => JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality))
            .write_image(pixels, width, height, ExtendedColorType::Rgb8),
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer).write_image(pixels, width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::WebP => WebPEncoder::new_lossless(&mut buffer).write_image(
            pixels,
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
    };
    written.map_err(|e| EngineError::EncodingFailed(format!("{}: {}", format.mime_type(), e)))?;

    Ok(EncodedResult::new(buffer.into_inner(), format))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
