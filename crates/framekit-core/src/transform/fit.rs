//! Fit-to-canvas compositing.
//!
//! The source is scaled uniformly to fit inside the canvas and centered.
//! The letterbox area is filled by the same bitmap stretched to the full
//! canvas and heavily blurred, so the output never has flat bars.

use image::imageops;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::resample::{resample_with, FilterType, ResampleOptions};
use crate::bitmap::Bitmap;
use crate::error::{EngineError, Result};

/// Placement of the scaled source inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitLayout {
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Options for [`fit_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Gaussian sigma of the background blur, in canvas pixels.
    pub blur_sigma: f32,
    /// Filter for scaling both layers.
    pub filter: FilterType,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            blur_sigma: 50.0,
            filter: FilterType::Lanczos3,
        }
    }
}

/// The composited canvas and where the foreground landed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutput {
    pub output: Bitmap,
    pub layout: FitLayout,
}

/// Compute the uniform scale and centered placement of a source in a canvas.
///
/// # Errors
///
/// Returns `EngineError::InvalidDimensions` if any dimension is 0.
pub fn compute_fit_layout(
    source_width: u32,
    source_height: u32,
    canvas_width: u32,
    canvas_height: u32,
) -> Result<FitLayout> {
    if source_width == 0 || source_height == 0 {
        return Err(EngineError::InvalidDimensions {
            width: source_width,
            height: source_height,
        });
    }
    if canvas_width == 0 || canvas_height == 0 {
        return Err(EngineError::InvalidDimensions {
            width: canvas_width,
            height: canvas_height,
        });
    }

    let scale = (canvas_width as f64 / source_width as f64)
        .min(canvas_height as f64 / source_height as f64);

    let scaled = |size: u32, canvas: u32| -> u32 {
        ((size as f64 * scale).round() as u32).clamp(1, canvas)
    };
    let scaled_width = scaled(source_width, canvas_width);
    let scaled_height = scaled(source_height, canvas_height);

    // Odd remainders round toward the far side; offset + size stays <= canvas
    let offset = |canvas: u32, size: u32| -> u32 { ((canvas - size) as f64 / 2.0).round() as u32 };

    Ok(FitLayout {
        scale,
        scaled_width,
        scaled_height,
        offset_x: offset(canvas_width, scaled_width),
        offset_y: offset(canvas_height, scaled_height),
    })
}

/// Composite `source` onto a `canvas_width x canvas_height` canvas with default options.
pub fn fit(source: &Bitmap, canvas_width: u32, canvas_height: u32) -> Result<FitOutput> {
    fit_with(source, canvas_width, canvas_height, &FitOptions::default())
}

pub fn fit_with(
    source: &Bitmap,
    canvas_width: u32,
    canvas_height: u32,
    options: &FitOptions,
) -> Result<FitOutput> {
    let layout = compute_fit_layout(source.width(), source.height(), canvas_width, canvas_height)?;
    debug!(
        canvas_width,
        canvas_height,
        scale = layout.scale,
        offset_x = layout.offset_x,
        offset_y = layout.offset_y,
        "fit layout"
    );
    let filter = options.filter.to_image_filter();
    let src = source.as_rgb_image();

    let stretched = imageops::resize(src, canvas_width, canvas_height, filter);
    let mut canvas = if options.blur_sigma > 0.0 {
        imageops::fast_blur(&stretched, options.blur_sigma)
    } else {
        stretched
    };

    let foreground = if (layout.scaled_width, layout.scaled_height) == source.dimensions() {
        source.clone()
    } else {
        let resample = ResampleOptions {
            filter: options.filter,
        };
        resample_with(source, layout.scaled_width, layout.scaled_height, &resample)?
    };
    imageops::replace(
        &mut canvas,
        foreground.as_rgb_image(),
        layout.offset_x as i64,
        layout.offset_y as i64,
    );

    Ok(FitOutput {
        output: Bitmap::from_rgb_image(canvas)?,
        layout,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: The scaled source always fits inside the canvas.
        #[test]
        fn prop_layout_within_canvas(
            (sw, sh) in (1u32..=20_000, 1u32..=20_000),
            (cw, ch) in (1u32..=8_000, 1u32..=8_000),
        ) {
            let layout = compute_fit_layout(sw, sh, cw, ch).unwrap();
            prop_assert!(layout.scaled_width >= 1 && layout.scaled_width <= cw);
            prop_assert!(layout.scaled_height >= 1 && layout.scaled_height <= ch);
            prop_assert!(layout.offset_x + layout.scaled_width <= cw);
            prop_assert!(layout.offset_y + layout.scaled_height <= ch);
        }

        /// Property: One axis fills the canvas (up to rounding).
        #[test]
        fn prop_layout_touches_canvas(
            (sw, sh) in (1u32..=5_000, 1u32..=5_000),
            (cw, ch) in (1u32..=5_000, 1u32..=5_000),
        ) {
            let layout = compute_fit_layout(sw, sh, cw, ch).unwrap();
            prop_assert!(layout.scaled_width == cw || layout.scaled_height == ch);
        }

        /// Property: Output is always exactly canvas-sized.
        #[test]
        fn prop_fit_output_is_canvas_sized(
            (sw, sh) in (1u32..=64, 1u32..=64),
            (cw, ch) in (16u32..=64, 16u32..=64),
        ) {
            let source = Bitmap::solid(sw, sh, [1, 2, 3]).unwrap();
            let options = FitOptions { blur_sigma: 2.0, ..FitOptions::default() };
            let result = fit_with(&source, cw, ch, &options).unwrap();
            prop_assert_eq!(result.output.dimensions(), (cw, ch));
        }
    }
}
