//! Rectangle, bounds and aspect constraint math for crop selections.
//!
//! All values are in source-bitmap units and stay fractional during
//! interaction; they are rounded to whole pixels only at extraction.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::transform::{compute_rotated_bounds, Rotation};

/// Smallest selection edge, in source units.
pub const DEFAULT_MIN_SIZE: f64 = 20.0;

/// Tolerance used when checking the fixed-ratio invariant.
pub const RATIO_TOLERANCE: f64 = 1e-6;

/// A point in source-bitmap coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A crop selection. Origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// True if the point lies inside the rectangle (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Check the containment and minimum-size invariant with an absolute tolerance.
    pub fn satisfies(&self, bounds: Bounds, min: (f64, f64), eps: f64) -> bool {
        self.x >= -eps
            && self.y >= -eps
            && self.right() <= bounds.width() + eps
            && self.bottom() <= bounds.height() + eps
            && self.width >= min.0 - eps
            && self.height >= min.1 - eps
    }
}

/// The area a selection must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    width: f64,
    height: f64,
}

impl Bounds {
    /// Bounds matching a bitmap of the given pixel size.
    pub fn from_dimensions(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width: width as f64,
            height: height as f64,
        })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The same bounds with width and height exchanged.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// The frame occupied by a source of these bounds after `rotation`.
    #[must_use]
    pub fn rotated(self, rotation: Rotation) -> Self {
        let (width, height) =
            compute_rotated_bounds(self.width as u32, self.height as u32, rotation);
        Self {
            width: width as f64,
            height: height as f64,
        }
    }
}

/// Carry `rect` from frame `from` into frame `to` through a clockwise turn
/// of `degrees` about the shared center.
///
/// Quarter turns are exact and exchange width and height. Other angles move
/// the center and keep the size, since an axis-aligned rect cannot follow
/// the tilted content exactly.
pub(crate) fn rotate_rect(rect: Rect, from: Bounds, to: Bounds, degrees: u32) -> Rect {
    let center = rect.center();
    let dx = center.x - from.width / 2.0;
    let dy = center.y - from.height / 2.0;

    let (rx, ry, width, height) = match degrees % 360 {
        0 => (dx, dy, rect.width, rect.height),
        90 => (-dy, dx, rect.height, rect.width),
        180 => (-dx, -dy, rect.width, rect.height),
        270 => (dy, -dx, rect.height, rect.width),
        d => {
            let (sin, cos) = (d as f64).to_radians().sin_cos();
            (dx * cos - dy * sin, dx * sin + dy * cos, rect.width, rect.height)
        }
    };

    let cx = to.width / 2.0 + rx;
    let cy = to.height / 2.0 + ry;
    Rect::new(cx - width / 2.0, cy - height / 2.0, width, height)
}

/// Free-form or fixed `width / height` ratio policy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AspectConstraint {
    #[default]
    Free,
    Fixed(f64),
}

impl AspectConstraint {
    /// A fixed ratio from a pair like `16:9`.
    pub fn from_pair(width: f64, height: f64) -> Result<Self> {
        let ratio = width / height;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(EngineError::InvalidOptions(format!(
                "aspect ratio {}:{} must be positive",
                width, height
            )));
        }
        Ok(AspectConstraint::Fixed(ratio))
    }

    /// The ratio if fixed. Non-positive or non-finite ratios behave as `Free`.
    pub fn ratio(self) -> Option<f64> {
        match self {
            AspectConstraint::Fixed(r) if r.is_finite() && r > 0.0 => Some(r),
            _ => None,
        }
    }
}

/// Clamp that prefers `lo` when the range is empty instead of panicking.
#[inline]
pub(crate) fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.min(hi).max(lo)
}

/// Smallest `(width, height)` a selection may have inside `bounds`.
///
/// Free selections use `min_size` per axis, capped at the bounds. Fixed
/// selections put `min_size` on the shorter side and derive the longer one,
/// then scale the pair down uniformly if the bounds cannot hold it.
pub fn min_extent(bounds: Bounds, aspect: AspectConstraint, min_size: f64) -> (f64, f64) {
    match aspect.ratio() {
        None => (min_size.min(bounds.width), min_size.min(bounds.height)),
        Some(r) => {
            let (w, h) = if r >= 1.0 {
                (min_size * r, min_size)
            } else {
                (min_size, min_size / r)
            };
            shrink_to_fit(w, h, bounds.width, bounds.height)
        }
    }
}

/// Uniformly scale `(w, h)` down until it fits `(max_w, max_h)`.
pub(crate) fn shrink_to_fit(w: f64, h: f64, max_w: f64, max_h: f64) -> (f64, f64) {
    let factor = (max_w / w).min(max_h / h).min(1.0);
    (w * factor, h * factor)
}

/// Uniformly scale `(w, h)` up until both sides reach the minimum.
pub(crate) fn grow_to_min(w: f64, h: f64, min_w: f64, min_h: f64) -> (f64, f64) {
    let factor = (min_w / w).max(min_h / h).max(1.0);
    (w * factor, h * factor)
}

/// The largest rectangle of the given aspect centered in `bounds`.
pub fn full_frame(bounds: Bounds, aspect: AspectConstraint) -> Rect {
    let (w, h) = match aspect.ratio() {
        None => (bounds.width, bounds.height),
        Some(r) if bounds.width / bounds.height > r => (bounds.height * r, bounds.height),
        Some(r) => (bounds.width, bounds.width / r),
    };
    Rect::new((bounds.width - w) / 2.0, (bounds.height - h) / 2.0, w, h)
}
