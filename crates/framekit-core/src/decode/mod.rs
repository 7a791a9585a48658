//! Image decoding.
//!
//! Turns JPEG, PNG and WebP file bytes into a [`Bitmap`], applying the EXIF
//! orientation so the bitmap is upright. HEIC/HEIF files are rejected with
//! `UnsupportedFormat`; hosts convert them with an external codec first.

mod orientation;

pub use orientation::{read_orientation, Orientation};

use tracing::debug;

use crate::bitmap::Bitmap;
use crate::encode::OutputFormat;
use crate::error::{EngineError, Result};

/// Decode file bytes to an upright RGB bitmap.
///
/// `media_type` is the declared type (e.g. from an upload). When absent the
/// format is sniffed from the leading bytes.
///
/// # Errors
///
/// Returns `EngineError::UnsupportedFormat` for unknown or unsupported media
/// types, and `EngineError::DecodeFailed` if the bytes cannot be decoded.
pub fn decode(bytes: &[u8], media_type: Option<&str>) -> Result<Bitmap> {
    let format = match media_type {
        Some(media_type) => OutputFormat::from_media_type(media_type)?,
        None => sniff_format(bytes)?,
    };

    let orientation = read_orientation(bytes);
    debug!(
        format = format.mime_type(),
        bytes = bytes.len(),
        ?orientation,
        "decoding image"
    );

    let img = image::load_from_memory_with_format(bytes, format.image_format())
        .map_err(|e| EngineError::DecodeFailed(e.to_string()))?;

    let oriented = orientation::apply_orientation(img, orientation);
    Bitmap::from_rgb_image(oriented.into_rgb8())
}

/// Identify a supported format from magic bytes.
pub fn sniff_format(bytes: &[u8]) -> Result<OutputFormat> {
    let guessed = image::guess_format(bytes)
        .map_err(|_| EngineError::DecodeFailed("unrecognized image data".to_string()))?;
    match guessed {
        image::ImageFormat::Jpeg => Ok(OutputFormat::Jpeg),
        image::ImageFormat::Png => Ok(OutputFormat::Png),
        image::ImageFormat::WebP => Ok(OutputFormat::WebP),
        other => Err(EngineError::UnsupportedFormat(
            other.to_mime_type().to_string(),
        )),
    }
}
