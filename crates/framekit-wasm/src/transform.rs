//! WASM bindings for pixel transforms: fit, rotation, crop extraction and resampling.

use crate::types::{filter_from_u8, interpolation, options_from_js, to_js_error, JsBitmap};
use framekit_core::transform::{self, FitOptions, ResampleOptions, Rotation};
use framekit_core::Rect;
use wasm_bindgen::prelude::*;

/// Result of [`fit_to_canvas`]: the composited canvas and the foreground placement.
#[wasm_bindgen]
pub struct JsFitResult {
    image: Option<JsBitmap>,
    scale: f64,
    scaled_width: u32,
    scaled_height: u32,
    offset_x: u32,
    offset_y: u32,
}

#[wasm_bindgen]
impl JsFitResult {
    /// Take the composited image. Subsequent calls return `undefined`.
    pub fn take_image(&mut self) -> Option<JsBitmap> {
        self.image.take()
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[wasm_bindgen(getter)]
    pub fn scaled_width(&self) -> u32 {
        self.scaled_width
    }

    #[wasm_bindgen(getter)]
    pub fn scaled_height(&self) -> u32 {
        self.scaled_height
    }

    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> u32 {
        self.offset_x
    }

    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> u32 {
        self.offset_y
    }
}

/// Composite an image onto a canvas over a blurred copy of itself.
///
/// `options` is an optional `{ blur_sigma, filter }` object.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const result = fit_to_canvas(photo, 1080, 1080, { blur_sigma: 40 });
/// const canvasImage = result.take_image();
/// ```
#[wasm_bindgen]
pub fn fit_to_canvas(
    image: &JsBitmap,
    canvas_width: u32,
    canvas_height: u32,
    options: JsValue,
) -> Result<JsFitResult, JsValue> {
    let options: FitOptions = options_from_js(options)?;
    fit_impl(image, canvas_width, canvas_height, &options).map_err(to_js_error)
}

fn fit_impl(
    image: &JsBitmap,
    canvas_width: u32,
    canvas_height: u32,
    options: &FitOptions,
) -> framekit_core::Result<JsFitResult> {
    let output = transform::fit_with(image.as_bitmap(), canvas_width, canvas_height, options)?;
    let layout = output.layout;
    Ok(JsFitResult {
        image: Some(JsBitmap::from_bitmap(output.output)),
        scale: layout.scale,
        scaled_width: layout.scaled_width,
        scaled_height: layout.scaled_height,
        offset_x: layout.offset_x,
        offset_y: layout.offset_y,
    })
}

/// Rotate an image by whole degrees (positive = clockwise).
///
/// Quarter turns are exact. Other angles expand the canvas to fit the
/// rotated image and interpolate with bilinear or Lanczos3 filtering.
///
/// # Example (TypeScript)
///
/// ```typescript
/// // Preview rotation (fast, bilinear)
/// const rotated = apply_rotation(sourceImage, 15, false);
/// ```
#[wasm_bindgen]
pub fn apply_rotation(
    image: &JsBitmap,
    degrees: i32,
    use_lanczos: bool,
) -> Result<JsBitmap, JsValue> {
    transform::apply_rotation(image.as_bitmap(), Rotation::new(degrees), interpolation(use_lanczos))
        .map(JsBitmap::from_bitmap)
        .map_err(to_js_error)
}

/// Extract a rectangle (in pixels of the rotated frame) after rotating the source.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const cropped = extract_region(sourceImage, 10.5, 20, 300, 200, 90, true);
/// ```
#[wasm_bindgen]
pub fn extract_region(
    image: &JsBitmap,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    degrees: i32,
    use_lanczos: bool,
) -> Result<JsBitmap, JsValue> {
    let rect = Rect::new(x, y, width, height);
    transform::extract_with(
        image.as_bitmap(),
        &rect,
        Rotation::new(degrees),
        interpolation(use_lanczos),
    )
    .map(JsBitmap::from_bitmap)
    .map_err(to_js_error)
}

/// Resample an image to exact dimensions with step-down reduction.
///
/// # Arguments
///
/// * `filter` - Final pass filter: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3, 3 = CatmullRom
///
/// # Example (TypeScript)
///
/// ```typescript
/// const thumb = resample(photo, 300, 200, 2);
/// ```
#[wasm_bindgen]
pub fn resample(
    image: &JsBitmap,
    target_width: u32,
    target_height: u32,
    filter: u8,
) -> Result<JsBitmap, JsValue> {
    let options = ResampleOptions {
        filter: filter_from_u8(filter),
    };
    transform::resample_with(image.as_bitmap(), target_width, target_height, &options)
        .map(JsBitmap::from_bitmap)
        .map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use framekit_core::Bitmap;

    /// Create a simple test image.
    fn test_image(width: u32, height: u32) -> JsBitmap {
        let pixels: Vec<u8> = (0..(width * height * 3) as usize)
            .map(|i| (i % 256) as u8)
            .collect();
        JsBitmap::from_bitmap(Bitmap::new(width, height, pixels).unwrap())
    }

    #[test]
    fn test_fit_layout_fields() {
        let img = test_image(400, 300);
        let mut result = fit_impl(&img, 200, 200, &FitOptions::default()).unwrap();
        assert_eq!(result.scale(), 0.5);
        assert_eq!((result.scaled_width(), result.scaled_height()), (200, 150));
        assert_eq!((result.offset_x(), result.offset_y()), (0, 25));

        let canvas = result.take_image().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (200, 200));
        assert!(result.take_image().is_none());
    }

    #[test]
    fn test_rotation_90_degrees() {
        let img = test_image(100, 50);
        let result = apply_rotation(&img, 90, false).unwrap();
        // 90-degree rotation swaps dimensions
        assert_eq!(result.width(), 50);
        assert_eq!(result.height(), 100);
    }

    #[test]
    fn test_rotation_45_degrees_expands() {
        let img = test_image(100, 100);
        let result = apply_rotation(&img, 45, true).unwrap();
        assert!(result.width() > 100);
        assert!(result.height() > 100);
    }

    #[test]
    fn test_extract_region_rounds() {
        let img = test_image(100, 80);
        let result = extract_region(&img, 10.4, 5.0, 30.6, 20.2, 0, false).unwrap();
        assert_eq!((result.width(), result.height()), (31, 20));
    }

    #[test]
    fn test_extract_region_after_quarter_turn() {
        let img = test_image(100, 80);
        let result = extract_region(&img, 0.0, 0.0, 80.0, 100.0, -90, false).unwrap();
        assert_eq!((result.width(), result.height()), (80, 100));
    }

    #[test]
    fn test_resample_dimensions() {
        let img = test_image(640, 480);
        for filter in 0..=3 {
            let result = resample(&img, 64, 40, filter).unwrap();
            assert_eq!((result.width(), result.height()), (64, 40));
        }
    }
}
