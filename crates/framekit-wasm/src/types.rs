//! WASM-compatible wrapper types for bitmaps and shared conversions.
//!
//! This module provides JavaScript-friendly types that wrap the core Framekit
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use framekit_core::{Bitmap, EngineError, FilterType, InterpolationFilter, OutputFormat};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// An RGB bitmap held in WASM memory.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`. Keep bitmaps in WASM memory between
/// operations and only extract pixels when drawing.
///
/// The `free()` method can be called to explicitly release WASM memory, but this is
/// optional as wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsBitmap {
    inner: Bitmap,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a bitmap from RGB pixel data (3 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsBitmap, JsValue> {
        Bitmap::new(width, height, pixels)
            .map(JsBitmap::from_bitmap)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3 for RGB)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels().len()
    }

    /// Returns RGB pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsBitmap {
    pub(crate) fn from_bitmap(inner: Bitmap) -> Self {
        Self { inner }
    }

    pub(crate) fn as_bitmap(&self) -> &Bitmap {
        &self.inner
    }
}

/// Convert an engine error into the string error thrown on the JS side.
pub(crate) fn to_js_error(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Read an options object, falling back to defaults for `undefined` or `null`.
pub(crate) fn options_from_js<T>(value: JsValue) -> Result<T, JsValue>
where
    T: DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))
}

/// Parse a format name (`jpeg`, `png`, `webp`) or a media type.
pub(crate) fn parse_format(name: &str) -> Result<OutputFormat, EngineError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
        "png" => Ok(OutputFormat::Png),
        "webp" => Ok(OutputFormat::WebP),
        _ => OutputFormat::from_media_type(name),
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear
/// - 2 = Lanczos3 (best quality, slowest)
/// - 3 = CatmullRom
///
/// Any other value defaults to Lanczos3.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        1 => FilterType::Bilinear,
        3 => FilterType::CatmullRom,
        _ => FilterType::Lanczos3,
    }
}

pub(crate) fn interpolation(use_lanczos: bool) -> InterpolationFilter {
    if use_lanczos {
        InterpolationFilter::Lanczos3
    } else {
        InterpolationFilter::Bilinear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_bitmap_wraps_core_bitmap() {
        let img = JsBitmap::from_bitmap(Bitmap::solid(100, 50, [1, 2, 3]).unwrap());
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 15000);
        assert_eq!(&img.pixels()[0..3], &[1, 2, 3]);
        assert_eq!(img.as_bitmap().dimensions(), (100, 50));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("jpeg"), Ok(OutputFormat::Jpeg));
        assert_eq!(parse_format("JPG"), Ok(OutputFormat::Jpeg));
        assert_eq!(parse_format("webp"), Ok(OutputFormat::WebP));
        assert_eq!(parse_format("image/png"), Ok(OutputFormat::Png));
        assert!(matches!(
            parse_format("image/heic"),
            Err(EngineError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), FilterType::Nearest);
        assert_eq!(filter_from_u8(1), FilterType::Bilinear);
        assert_eq!(filter_from_u8(2), FilterType::Lanczos3);
        assert_eq!(filter_from_u8(3), FilterType::CatmullRom);
        // Unknown values default to Lanczos3
        assert_eq!(filter_from_u8(255), FilterType::Lanczos3);
    }

    #[test]
    fn test_interpolation() {
        assert_eq!(interpolation(true), InterpolationFilter::Lanczos3);
        assert_eq!(interpolation(false), InterpolationFilter::Bilinear);
    }
}
