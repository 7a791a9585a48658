//! Final pixel extraction of a crop selection.
//!
//! Selections are fractional while the user edits them. Extraction rounds the
//! rectangle to whole pixels, applies the frame rotation to the source first,
//! and copies the region out of the rotated frame.
//!
//! # Rounding
//!
//! - Output size is `round(width) x round(height)`, capped at the frame
//! - Origin is `round(x), round(y)`, shifted inward if the rounded size would
//!   run past the frame edge, so the output size never shrinks from rounding

use image::imageops;
use serde::{Deserialize, Serialize};

use super::rotation::{apply_rotation, InterpolationFilter, Rotation};
use crate::bitmap::Bitmap;
use crate::error::{EngineError, Result};
use crate::selection::Rect;

/// A crop region in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[inline]
fn round_to_pixels(value: f64, max: u32) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, max as f64) as u32
}

/// Round a selection to pixel bounds inside a `frame_width x frame_height` frame.
///
/// # Errors
///
/// Returns `EngineError::DegenerateRegion` if the rounded width or height is 0.
pub fn pixel_region(rect: &Rect, frame_width: u32, frame_height: u32) -> Result<PixelRegion> {
    let width = round_to_pixels(rect.width, frame_width);
    let height = round_to_pixels(rect.height, frame_height);
    if width == 0 || height == 0 {
        return Err(EngineError::DegenerateRegion { width, height });
    }

    let x = round_to_pixels(rect.x, frame_width).min(frame_width - width);
    let y = round_to_pixels(rect.y, frame_height).min(frame_height - height);

    Ok(PixelRegion {
        x,
        y,
        width,
        height,
    })
}

/// Copy a pixel region out of an image.
///
/// The region must already lie inside the image (see [`pixel_region`]).
pub fn apply_crop(image: &Bitmap, region: PixelRegion) -> Result<Bitmap> {
    // Fast path: full crop returns a clone
    if region.x == 0 && region.y == 0 && (region.width, region.height) == image.dimensions() {
        return Ok(image.clone());
    }

    let view = imageops::crop_imm(
        image.as_rgb_image(),
        region.x,
        region.y,
        region.width,
        region.height,
    );
    Bitmap::from_rgb_image(view.to_image())
}

/// Extract a selection from `source` after rotating it by `rotation`.
///
/// Quarter turns are exact; other angles use bilinear interpolation. See
/// [`extract_with`] to pick the filter.
pub fn extract(source: &Bitmap, rect: &Rect, rotation: Rotation) -> Result<Bitmap> {
    extract_with(source, rect, rotation, InterpolationFilter::default())
}

pub fn extract_with(
    source: &Bitmap,
    rect: &Rect,
    rotation: Rotation,
    filter: InterpolationFilter,
) -> Result<Bitmap> {
    let rotated = apply_rotation(source, rotation, filter)?;
    let region = pixel_region(rect, rotated.width(), rotated.height())?;
    apply_crop(&rotated, region)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
