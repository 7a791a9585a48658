//! WASM bindings for image decoding.

use crate::types::{to_js_error, JsBitmap};
use framekit_core::decode;
use wasm_bindgen::prelude::*;

/// Decode JPEG, PNG or WebP file bytes into an upright bitmap.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes
/// * `media_type` - Declared type such as `file.type`; sniffed when `undefined`
///
/// # Errors
///
/// Throws for HEIC/HEIF and other unsupported types (convert them first),
/// and for corrupted files.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const image = decode_image(bytes, file.type || undefined);
/// console.log(`Decoded ${image.width}x${image.height}`);
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8], media_type: Option<String>) -> Result<JsBitmap, JsValue> {
    decode::decode(bytes, media_type.as_deref())
        .map(JsBitmap::from_bitmap)
        .map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use framekit_core::{encode, Bitmap, OutputFormat};

    #[test]
    fn test_decode_png_bytes() {
        let bitmap = Bitmap::solid(12, 7, [200, 100, 50]).unwrap();
        let encoded = encode(&bitmap, OutputFormat::Png, 1.0).unwrap();

        let image = decode_image(&encoded.bytes, Some("image/png".to_string())).unwrap();
        assert_eq!((image.width(), image.height()), (12, 7));
        assert_eq!(&image.pixels()[0..3], &[200, 100, 50]);
    }

    #[test]
    fn test_decode_sniffs_format() {
        let bitmap = Bitmap::solid(9, 4, [1, 1, 1]).unwrap();
        let encoded = encode(&bitmap, OutputFormat::Jpeg, 0.8).unwrap();
        let image = decode_image(&encoded.bytes, None).unwrap();
        assert_eq!((image.width(), image.height()), (9, 4));
    }
}
