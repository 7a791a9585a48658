//! Interactive crop selection geometry.
//!
//! This module keeps a crop rectangle valid while a user drags it, resizes
//! it from a corner, switches aspect ratio or rotates the frame. It never
//! touches pixels; [`CropSession::extract`] hands the final rectangle to
//! [`crate::transform::extract`].
//!
//! # Coordinate System
//!
//! - Everything is in source-bitmap units (convert display input with
//!   [`DisplayMapping`])
//! - Origin is the top-left corner
//! - Values are fractional until extraction rounds them

mod rect;
mod session;

pub use rect::{
    full_frame, min_extent, AspectConstraint, Bounds, Point, Rect, DEFAULT_MIN_SIZE,
    RATIO_TOLERANCE,
};
pub use session::{
    CropSession, DisplayMapping, Handle, Interaction, PointerEvent, SelectionOptions,
};
