//! Framekit Core - Image transform engine
//!
//! This crate provides the pixel-buffer operations behind Framekit:
//! fit-to-canvas compositing, interactive crop geometry with rotation,
//! step-down resampling and target-size compression.
//!
//! Every operation is a pure function over an immutable [`Bitmap`] and returns
//! a freshly allocated result. The only stateful piece is [`CropSession`],
//! which is `Copy` and moves from state to state by value.

pub mod bitmap;
pub mod compress;
pub mod decode;
pub mod encode;
pub mod error;
pub mod selection;
pub mod transform;

pub use bitmap::Bitmap;
pub use compress::{
    compress_builtin, compress_to_target, compress_to_target_async, compress_to_target_until,
    CompressOptions, CompressOutcome, EncodeErrorPolicy, SearchProgress,
};
pub use decode::decode;
pub use encode::{encode, honors_quality, EncodedResult, OutputFormat};
pub use error::{EngineError, Result};
pub use selection::{
    AspectConstraint, Bounds, CropSession, DisplayMapping, Handle, Interaction, Point,
    PointerEvent, Rect, SelectionOptions,
};
pub use transform::{
    extract, extract_with, fit, fit_with, resample, resample_with, FilterType, FitLayout,
    FitOptions, FitOutput, InterpolationFilter, ResampleOptions, Rotation,
};
