//! Error taxonomy shared by every engine operation.

use thiserror::Error;

/// Errors raised by engine operations.
///
/// Every variant is terminal for the operation that raised it. Decode and
/// encode failures reported by external collaborators are carried through
/// unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A source or canvas dimension is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// A resample target dimension is zero.
    #[error("Invalid target: width ({width}) and height ({height}) must be non-zero")]
    InvalidTarget { width: u32, height: u32 },

    /// The crop region rounds to an empty pixel area.
    #[error("Degenerate region: {width}x{height} pixels")]
    DegenerateRegion { width: u32, height: u32 },

    /// Pixel buffer length doesn't match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// The media type is not one the decoder or encoder handles.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The bytes could not be decoded.
    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    /// The encoder could not produce output.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Option values out of their valid range.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Result alias used across the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
