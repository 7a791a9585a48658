//! Image encoding and target-size compression WASM bindings.
//!
//! # Functions
//!
//! - [`encode_image`] - Encode a bitmap with the built-in encoders
//! - [`compress_to_target`] - Binary-search the quality that fits a byte budget
//! - [`compress_with_encoder`] - Same search driven by a JavaScript encoder
//!
//! # Example
//!
//! ```typescript
//! import { compress_to_target } from '@framekit/wasm';
//!
//! const result = compress_to_target(image, 200_000, 'jpeg', undefined);
//! if (!result.reached_target) console.warn('Could not reach target size');
//! await writable.write(new Blob([result.bytes()], { type: result.mime_type }));
//! ```

use crate::types::{options_from_js, parse_format, to_js_error, JsBitmap};
use framekit_core::{
    compress, compress_builtin, encode, Bitmap, CompressOptions, CompressOutcome, EncodedResult,
    EngineError, OutputFormat,
};
use js_sys::{Array, Function, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Outcome of a target-size compression.
#[wasm_bindgen]
pub struct JsCompressResult {
    bytes: Vec<u8>,
    format: OutputFormat,
    quality: f32,
    reached_target: bool,
    probes: u32,
}

#[wasm_bindgen]
impl JsCompressResult {
    /// Encoded bytes as Uint8Array (a copy).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn size_in_bytes(&self) -> usize {
        self.bytes.len()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.format.mime_type().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// False when even the lowest quality is over budget.
    #[wasm_bindgen(getter)]
    pub fn reached_target(&self) -> bool {
        self.reached_target
    }

    #[wasm_bindgen(getter)]
    pub fn probes(&self) -> u32 {
        self.probes
    }
}

impl From<CompressOutcome> for JsCompressResult {
    fn from(outcome: CompressOutcome) -> Self {
        Self {
            format: outcome.result.format,
            bytes: outcome.result.bytes,
            quality: outcome.quality,
            reached_target: outcome.reached_target,
            probes: outcome.probes,
        }
    }
}

/// Encode a bitmap as `jpeg`, `png` or `webp`.
///
/// `quality` in `[0, 1]` applies to JPEG only; PNG and WebP are lossless.
#[wasm_bindgen]
pub fn encode_image(image: &JsBitmap, format: &str, quality: f32) -> Result<Vec<u8>, JsValue> {
    let format = parse_format(format).map_err(to_js_error)?;
    encode(image.as_bitmap(), format, quality)
        .map(|result| result.bytes)
        .map_err(to_js_error)
}

/// Find the highest quality whose encoding fits `target_bytes`, using the
/// built-in encoders.
///
/// PNG and WebP are written losslessly and encoded once.
///
/// `options` is an optional `{ min_quality, max_quality, iterations,
/// on_encode_error }` object.
#[wasm_bindgen]
pub fn compress_to_target(
    image: &JsBitmap,
    target_bytes: f64,
    format: &str,
    options: JsValue,
) -> Result<JsCompressResult, JsValue> {
    let options: CompressOptions = options_from_js(options)?;
    let format = parse_format(format).map_err(to_js_error)?;
    compress_builtin(image.as_bitmap(), byte_budget(target_bytes), format, &options)
        .map(JsCompressResult::from)
        .map_err(to_js_error)
}

/// Same as [`compress_to_target`] with a JavaScript encoder.
///
/// `encoder(pixels: Uint8Array, width, height, quality) -> Uint8Array` is
/// called synchronously once per probe. The pixels are RGB, 3 bytes per pixel.
/// A thrown exception counts as an encoding failure, handled according to
/// `options.on_encode_error`.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const result = compress_with_encoder(image, 150_000, 'webp', (px, w, h, q) => myWebp(px, w, h, q), undefined);
/// ```
#[wasm_bindgen]
pub fn compress_with_encoder(
    image: &JsBitmap,
    target_bytes: f64,
    format: &str,
    encoder: &Function,
    options: JsValue,
) -> Result<JsCompressResult, JsValue> {
    let options: CompressOptions = options_from_js(options)?;
    let format = parse_format(format).map_err(to_js_error)?;
    let call = |bitmap: &Bitmap, quality: f32| call_encoder(encoder, bitmap, format, quality);
    compress::compress_to_target(
        image.as_bitmap(),
        byte_budget(target_bytes),
        format,
        call,
        &options,
    )
    .map(JsCompressResult::from)
    .map_err(to_js_error)
}

/// JS numbers to a byte count; negative and NaN budgets become 0.
fn byte_budget(target_bytes: f64) -> u64 {
    if target_bytes.is_nan() || target_bytes <= 0.0 {
        0
    } else {
        target_bytes.floor() as u64
    }
}

fn call_encoder(
    encoder: &Function,
    bitmap: &Bitmap,
    format: OutputFormat,
    quality: f32,
) -> framekit_core::Result<EncodedResult> {
    let args = Array::new();
    args.push(&Uint8Array::from(bitmap.pixels()));
    args.push(&JsValue::from(bitmap.width()));
    args.push(&JsValue::from(bitmap.height()));
    args.push(&JsValue::from(quality));

    let returned = encoder
        .apply(&JsValue::NULL, &args)
        .map_err(|e| EngineError::EncodingFailed(js_error_message(&e)))?;
    let bytes = returned.dyn_into::<Uint8Array>().map_err(|_| {
        EngineError::EncodingFailed("encoder must return a Uint8Array".to_string())
    })?;
    Ok(EncodedResult::new(bytes.to_vec(), format))
}

fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| "encoder threw".to_string())
}


/// WASM-specific tests that require JsValue.
///
/// These tests use functions that return `Result<T, JsValue>` on their
/// error paths or take JavaScript callbacks. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn solid() -> JsBitmap {
        JsBitmap::from_bitmap(Bitmap::solid(20, 20, [10, 200, 30]).unwrap())
    }

    #[wasm_bindgen_test]
    fn test_unknown_format_fails() {
        assert!(encode_image(&solid(), "gif", 0.5).is_err());
    }

    #[wasm_bindgen_test]
    fn test_js_encoder_is_searched() {
        // Size grows with quality: 1000 + 100000 * q bytes
        let encoder = Function::new_with_args(
            "px, w, h, q",
            "return new Uint8Array(Math.floor(1000 + 100000 * q));",
        );
        let result =
            compress_with_encoder(&solid(), 50_000.0, "webp", &encoder, JsValue::UNDEFINED)
                .unwrap();
        assert!(result.reached_target());
        assert!(result.size_in_bytes() <= 50_000);
        assert!(result.quality() > 0.45 && result.quality() <= 0.49);
        assert_eq!(result.mime_type(), "image/webp");
    }

    #[wasm_bindgen_test]
    fn test_js_encoder_throwing_aborts() {
        let encoder = Function::new_with_args("px, w, h, q", "throw new Error('boom');");
        assert!(
            compress_with_encoder(&solid(), 50_000.0, "jpeg", &encoder, JsValue::UNDEFINED)
                .is_err()
        );
    }

    #[wasm_bindgen_test]
    fn test_options_object_validated() {
        let options = serde_wasm_bindgen::to_value(&CompressOptions {
            iterations: 0,
            ..CompressOptions::default()
        })
        .unwrap();
        assert!(compress_to_target(&solid(), 10_000.0, "jpeg", options).is_err());
    }
}
