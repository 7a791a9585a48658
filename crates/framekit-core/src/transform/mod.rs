//! Pixel operations: fit compositing, rotation, crop extraction and resampling.
//!
//! Every operation takes a borrowed [`Bitmap`](crate::Bitmap) and returns a
//! freshly allocated one. Nothing here keeps state between calls.
//!
//! # Coordinate System
//!
//! - Rotation angles are integer degrees, positive = clockwise on screen
//! - Crop rectangles are in pixels of the rotated frame, and may be fractional
//! - Origin is top-left corner

mod crop;
mod fit;
mod resample;
mod rotation;

pub use crop::{apply_crop, extract, extract_with, pixel_region, PixelRegion};
pub use fit::{compute_fit_layout, fit, fit_with, FitLayout, FitOptions, FitOutput};
pub use resample::{resample, resample_with, step_down_plan, FilterType, ResampleOptions};
pub use rotation::{apply_rotation, compute_rotated_bounds, InterpolationFilter, Rotation};
