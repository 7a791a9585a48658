//! Image encoding.
//!
//! This module provides:
//! - [`OutputFormat`] and [`EncodedResult`], the types the compressor works with
//! - [`encode`], a built-in encoder for JPEG (lossy), PNG and WebP (lossless)
//!
//! Lossy WebP is not available from the `image` crate; hosts that need it
//! pass their own encoder to the compressor.

mod types;
mod writer;

pub use types::{EncodedResult, OutputFormat};
pub use writer::{encode, honors_quality, jpeg_quality};
