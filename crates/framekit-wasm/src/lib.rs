//! Framekit WASM - WebAssembly bindings for Framekit
//!
//! This crate provides WASM bindings to expose the framekit-core functionality
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible bitmap wrapper and shared conversions
//! - `decode` - File bytes to bitmap
//! - `transform` - Fit compositing, rotation, region extraction, resampling
//! - `crop` - Interactive crop session driven by pointer events
//! - `encode` - Encoding and target-size compression
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, fit_to_canvas } from '@framekit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes, file.type);
//! const story = fit_to_canvas(image, 1080, 1920, undefined).take_image();
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod decode;
mod encode;
mod transform;
mod types;

// Re-export public types
pub use crop::JsCropSession;
pub use decode::decode_image;
pub use encode::{compress_to_target, compress_with_encoder, encode_image, JsCompressResult};
pub use transform::{apply_rotation, extract_region, fit_to_canvas, resample, JsFitResult};
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
