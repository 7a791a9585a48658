//! High-quality resampling with step-down reduction.
//!
//! A single large-ratio resize (say 4000 → 400 px) under-samples with a
//! small-support filter and aliases. Instead, each axis is halved with an
//! exact area-average filter while it is more than twice its target, then
//! one direct resample lands on the exact target size.
//!
//! Each axis follows its own stopping condition, so a non-uniform aspect
//! change may halve one axis more times than the other.

use image::imageops;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::bitmap::Bitmap;
use crate::error::{EngineError, Result};

/// Filter type for the final direct resample pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Catmull-Rom bicubic interpolation.
    CatmullRom,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> imageops::FilterType {
        match self {
            FilterType::Nearest => imageops::FilterType::Nearest,
            FilterType::Bilinear => imageops::FilterType::Triangle,
            FilterType::CatmullRom => imageops::FilterType::CatmullRom,
            FilterType::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Options for [`resample_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleOptions {
    pub filter: FilterType,
}

/// Resample to exactly `width x height` with the default Lanczos3 final pass.
pub fn resample(source: &Bitmap, width: u32, height: u32) -> Result<Bitmap> {
    resample_with(source, width, height, &ResampleOptions::default())
}

/// Resample to exactly `width x height`.
///
/// # Errors
///
/// Returns `EngineError::InvalidTarget` if either target dimension is 0.
pub fn resample_with(
    source: &Bitmap,
    width: u32,
    height: u32,
    options: &ResampleOptions,
) -> Result<Bitmap> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidTarget { width, height });
    }

    // Fast path: if dimensions match, just clone
    if source.dimensions() == (width, height) {
        return Ok(source.clone());
    }

    let mut current = source.clone();
    for (step_w, step_h) in step_down_plan(source.width(), source.height(), width, height) {
        trace!(
            from_width = current.width(),
            from_height = current.height(),
            to_width = step_w,
            to_height = step_h,
            "area downsample pass"
        );
        current = area_downsample(&current, step_w, step_h)?;
    }

    if current.dimensions() == (width, height) {
        return Ok(current);
    }

    trace!(
        from_width = current.width(),
        from_height = current.height(),
        to_width = width,
        to_height = height,
        filter = ?options.filter,
        "final resample pass"
    );
    let resized = imageops::resize(
        current.as_rgb_image(),
        width,
        height,
        options.filter.to_image_filter(),
    );
    Bitmap::from_rgb_image(resized)
}

/// The intermediate sizes the step-down loop visits, excluding the source.
///
/// An axis more than twice its target halves to `max(floor(current / 2), target)`;
/// an axis already within 2x keeps its size for that pass. The plan ends once
/// neither axis needs halving.
pub fn step_down_plan(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> Vec<(u32, u32)> {
    fn halve(current: u32, target: u32) -> u32 {
        if current as u64 > 2 * target as u64 {
            (current / 2).max(target)
        } else {
            current
        }
    }

    let mut plan = Vec::new();
    let (mut w, mut h) = (source_width, source_height);
    loop {
        let next = (halve(w, target_width), halve(h, target_height));
        if next == (w, h) {
            return plan;
        }
        plan.push(next);
        (w, h) = next;
    }
}

/// Contribution of each source sample to one output sample along an axis.
struct AxisWeights {
    start: u32,
    weights: Vec<f32>,
}

/// Exact box-filter weights for reducing `src` samples to `dst` samples.
///
/// Output sample `i` covers source interval `[i * src / dst, (i + 1) * src / dst)`;
/// each source sample is weighted by its overlap with that interval.
fn axis_weights(src: u32, dst: u32) -> Vec<AxisWeights> {
    let ratio = src as f64 / dst as f64;
    (0..dst)
        .map(|i| {
            let lo = i as f64 * ratio;
            let hi = ((i + 1) as f64 * ratio).min(src as f64);
            let start = lo.floor() as u32;
            let end = (hi.ceil() as u32).min(src);

            let weights = (start..end)
                .map(|j| {
                    let overlap = (hi.min((j + 1) as f64) - lo.max(j as f64)).max(0.0);
                    overlap as f32
                })
                .collect();
            AxisWeights { start, weights }
        })
        .collect()
}

/// Area-average reduction to `width x height` (each at most the source size).
fn area_downsample(source: &Bitmap, width: u32, height: u32) -> Result<Bitmap> {
    let columns = axis_weights(source.width(), width);
    let rows = axis_weights(source.height(), height);
    let src = source.as_rgb_image();

    let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);
    for row in &rows {
        for column in &columns {
            let mut sum = [0.0f32; 3];
            let mut total = 0.0f32;
            for (dy, wy) in row.weights.iter().enumerate() {
                let y = row.start + dy as u32;
                for (dx, wx) in column.weights.iter().enumerate() {
                    let x = column.start + dx as u32;
                    let weight = wx * wy;
                    let p = src.get_pixel(x, y).0;
                    sum[0] += p[0] as f32 * weight;
                    sum[1] += p[1] as f32 * weight;
                    sum[2] += p[2] as f32 * weight;
                    total += weight;
                }
            }
            for channel in sum {
                pixels.push((channel / total).round().clamp(0.0, 255.0) as u8);
            }
        }
    }

    Bitmap::new(width, height, pixels)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
