//! The crop interaction state machine.
//!
//! A [`CropSession`] owns one selection rectangle plus the current
//! [`Interaction`]. Sessions are `Copy`: every transition consumes the
//! session and returns the next state, so a presentation layer can keep the
//! previous value around or compare states freely.
//!
//! # States
//!
//! ```text
//! Idle --down on body--> Dragging --up/leave--> Idle
//! Idle --down on handle h--> Resizing(h) --up/leave--> Idle
//! ```
//!
//! Moves are measured from the pointer position where the gesture started,
//! and applied to the rectangle as it was at that moment.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::rect::{
    clamp, full_frame, grow_to_min, min_extent, rotate_rect, shrink_to_fit, AspectConstraint,
    Bounds, Point, Rect, DEFAULT_MIN_SIZE,
};
use crate::bitmap::Bitmap;
use crate::error::{EngineError, Result};
use crate::transform::{extract_with, InterpolationFilter, Rotation};

/// Tunables for a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionOptions {
    /// Minimum selection edge in source units.
    pub min_size: f64,
    /// How close (in source units) a pointer must land to a corner to grab it.
    pub handle_tolerance: f64,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            handle_tolerance: 12.0,
        }
    }
}

/// A resize handle at one of the selection corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::NorthWest,
        Handle::NorthEast,
        Handle::SouthWest,
        Handle::SouthEast,
    ];

    #[inline]
    pub fn is_west(self) -> bool {
        matches!(self, Handle::NorthWest | Handle::SouthWest)
    }

    #[inline]
    pub fn is_north(self) -> bool {
        matches!(self, Handle::NorthWest | Handle::NorthEast)
    }

    /// The corner of `rect` this handle sits on.
    pub fn position(self, rect: &Rect) -> Point {
        let x = if self.is_west() { rect.x } else { rect.right() };
        let y = if self.is_north() { rect.y } else { rect.bottom() };
        Point::new(x, y)
    }
}

/// What the pointer is currently doing to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging,
    Resizing(Handle),
}

/// Pointer input, already in source units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    Leave,
}

/// Converts display-space pointer positions into source units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMapping {
    /// Display pixels per source unit.
    scale: f64,
}

impl DisplayMapping {
    pub fn new(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(EngineError::InvalidOptions(format!(
                "display scale must be positive, got {}",
                scale
            )));
        }
        Ok(Self { scale })
    }

    /// Mapping for a source shown `display_width` pixels wide.
    pub fn from_widths(display_width: f64, source_width: u32) -> Result<Self> {
        Self::new(display_width / source_width as f64)
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_source(&self, display: Point) -> Point {
        Point::new(display.x / self.scale, display.y / self.scale)
    }

    pub fn to_display(&self, source: Point) -> Point {
        Point::new(source.x * self.scale, source.y * self.scale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    origin: Point,
    start: Rect,
}

/// One editing session over a single source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSession {
    /// Unrotated source size.
    source: Bounds,
    /// The rotated frame the rect lives in.
    bounds: Bounds,
    rect: Rect,
    aspect: AspectConstraint,
    rotation: Rotation,
    interaction: Interaction,
    gesture: Option<Gesture>,
    options: SelectionOptions,
}

impl CropSession {
    /// Start a session with an initial selection.
    ///
    /// The rectangle is fitted into the bounds, minimum size and aspect
    /// constraint around its own center.
    pub fn new(bounds: Bounds, rect: Rect, aspect: AspectConstraint) -> Self {
        Self::with_options(bounds, rect, aspect, SelectionOptions::default())
    }

    pub fn with_options(
        bounds: Bounds,
        rect: Rect,
        aspect: AspectConstraint,
        options: SelectionOptions,
    ) -> Self {
        let mut session = Self {
            source: bounds,
            bounds,
            rect,
            aspect,
            rotation: Rotation::NONE,
            interaction: Interaction::Idle,
            gesture: None,
            options,
        };
        session.rect = session.normalized(rect);
        session
    }

    /// Start a session selecting the largest centered area of `aspect`.
    pub fn full_frame(bounds: Bounds, aspect: AspectConstraint) -> Self {
        Self::new(bounds, full_frame(bounds, aspect), aspect)
    }

    /// Start a full-frame session over a bitmap.
    pub fn for_bitmap(source: &Bitmap, aspect: AspectConstraint) -> Result<Self> {
        let bounds = Bounds::from_dimensions(source.width(), source.height())?;
        Ok(Self::full_frame(bounds, aspect))
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The frame the selection lives in, after rotation.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn source_bounds(&self) -> Bounds {
        self.source
    }

    #[inline]
    pub fn aspect(&self) -> AspectConstraint {
        self.aspect
    }

    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[inline]
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    #[inline]
    pub fn options(&self) -> SelectionOptions {
        self.options
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.interaction == Interaction::Idle
    }

    /// The smallest size the selection may currently take.
    ///
    /// A configured minimum below one source unit counts as one.
    pub fn min_extent(&self) -> (f64, f64) {
        let min_size = if self.options.min_size >= 1.0 {
            self.options.min_size
        } else {
            1.0
        };
        min_extent(self.bounds, self.aspect, min_size)
    }

    /// Dispatch a pointer event to the matching transition.
    #[must_use]
    pub fn handle(self, event: PointerEvent) -> Self {
        match event {
            PointerEvent::Down(p) => self.pointer_down(p),
            PointerEvent::Move(p) => self.pointer_move(p),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    /// Begin a drag or resize depending on what the pointer lands on.
    #[must_use]
    pub fn pointer_down(self, point: Point) -> Self {
        let interaction = match self.handle_at(point) {
            Some(handle) => Interaction::Resizing(handle),
            None if self.rect.contains(point) => Interaction::Dragging,
            None => Interaction::Idle,
        };

        let gesture = (interaction != Interaction::Idle).then_some(Gesture {
            origin: point,
            start: self.rect,
        });
        trace!(?interaction, x = point.x, y = point.y, "pointer down");

        Self {
            interaction,
            gesture,
            ..self
        }
    }

    #[must_use]
    pub fn pointer_move(self, point: Point) -> Self {
        let Some(gesture) = self.gesture else {
            return self;
        };
        let dx = point.x - gesture.origin.x;
        let dy = point.y - gesture.origin.y;

        let rect = match self.interaction {
            Interaction::Idle => return self,
            Interaction::Dragging => self.translated(gesture.start, dx, dy),
            Interaction::Resizing(handle) => self.resized(gesture.start, handle, dx, dy),
        };

        Self { rect, ..self }
    }

    #[must_use]
    pub fn pointer_up(self) -> Self {
        Self {
            interaction: Interaction::Idle,
            gesture: None,
            ..self
        }
    }

    #[must_use]
    pub fn pointer_leave(self) -> Self {
        self.pointer_up()
    }

    /// Switch the aspect constraint, refitting the selection around its center.
    ///
    /// Ignored while a gesture is in progress.
    #[must_use]
    pub fn set_aspect(self, aspect: AspectConstraint) -> Self {
        if !self.is_idle() {
            return self;
        }
        let mut next = Self { aspect, ..self };
        next.rect = next.normalized(self.rect);
        next
    }

    /// Rotate the frame by a step in degrees (typically ±90).
    ///
    /// The bounds become the rotated bounding box of the source, and the
    /// selection turns with the content it covers before being refit. Any
    /// gesture in progress ends.
    #[must_use]
    pub fn rotate_by(self, step_degrees: i32) -> Self {
        let rotation = self.rotation.step(step_degrees);
        let bounds = self.source.rotated(rotation);
        let turned = rotate_rect(
            self.rect,
            self.bounds,
            bounds,
            Rotation::new(step_degrees).degrees(),
        );

        trace!(degrees = rotation.degrees(), "crop frame rotated");

        let mut next = Self {
            bounds,
            rotation,
            interaction: Interaction::Idle,
            gesture: None,
            ..self
        };
        next.rect = next.normalized(turned);
        next
    }

    /// Replace the selection with the full frame for the current aspect.
    #[must_use]
    pub fn reset(self) -> Self {
        Self {
            rect: self.normalized(full_frame(self.bounds, self.aspect)),
            interaction: Interaction::Idle,
            gesture: None,
            ..self
        }
    }

    /// Extract the selection from `source` with the session's rotation.
    pub fn extract(&self, source: &Bitmap) -> Result<Bitmap> {
        self.extract_with(source, InterpolationFilter::default())
    }

    pub fn extract_with(&self, source: &Bitmap, filter: InterpolationFilter) -> Result<Bitmap> {
        extract_with(source, &self.rect, self.rotation, filter)
    }

    fn handle_at(&self, point: Point) -> Option<Handle> {
        let tolerance = self.options.handle_tolerance;
        Handle::ALL
            .into_iter()
            .map(|h| {
                let corner = h.position(&self.rect);
                (h, (point.x - corner.x).abs(), (point.y - corner.y).abs())
            })
            .filter(|&(_, dx, dy)| dx <= tolerance && dy <= tolerance)
            .min_by(|a, b| (a.1 + a.2).total_cmp(&(b.1 + b.2)))
            .map(|(h, _, _)| h)
    }

    fn translated(&self, start: Rect, dx: f64, dy: f64) -> Rect {
        let max_x = (self.bounds.width() - start.width).max(0.0);
        let max_y = (self.bounds.height() - start.height).max(0.0);
        Rect {
            x: clamp(start.x + dx, 0.0, max_x),
            y: clamp(start.y + dy, 0.0, max_y),
            ..start
        }
    }

    fn resized(&self, start: Rect, handle: Handle, dx: f64, dy: f64) -> Rect {
        let (bw, bh) = (self.bounds.width(), self.bounds.height());
        let (min_w, min_h) = self.min_extent();

        let mut left = start.x;
        let mut top = start.y;
        let mut right = start.right();
        let mut bottom = start.bottom();

        if handle.is_west() {
            left = clamp(left + dx, 0.0, right - min_w);
        } else {
            right = clamp(right + dx, left + min_w, bw);
        }
        if handle.is_north() {
            top = clamp(top + dy, 0.0, bottom - min_h);
        } else {
            bottom = clamp(bottom + dy, top + min_h, bh);
        }

        let Some(ratio) = self.aspect.ratio() else {
            return Rect::new(left, top, right - left, bottom - top);
        };

        // The corner opposite the handle stays put
        let anchor_x = if handle.is_west() { right } else { left };
        let anchor_y = if handle.is_north() { bottom } else { top };
        let room_w = if handle.is_west() { anchor_x } else { bw - anchor_x };
        let room_h = if handle.is_north() { anchor_y } else { bh - anchor_y };

        let (mut w, mut h) = (right - left, bottom - top);
        if dx.abs() >= dy.abs() * ratio {
            h = w / ratio;
        } else {
            w = h * ratio;
        }
        let (w, h) = grow_to_min(w, h, min_w, min_h);
        let (w, h) = shrink_to_fit(w, h, room_w, room_h);

        let x = if handle.is_west() { anchor_x - w } else { anchor_x };
        let y = if handle.is_north() { anchor_y - h } else { anchor_y };
        Rect::new(x.max(0.0), y.max(0.0), w, h)
    }

    /// Fit `rect` into the current bounds, minimum size and aspect, keeping its center.
    fn normalized(&self, rect: Rect) -> Rect {
        let (bw, bh) = (self.bounds.width(), self.bounds.height());
        let (min_w, min_h) = self.min_extent();

        let width = if rect.width.is_finite() { rect.width } else { bw };
        let height = if rect.height.is_finite() { rect.height } else { bh };

        let (w, h) = match self.aspect.ratio() {
            None => (clamp(width, min_w, bw), clamp(height, min_h, bh)),
            Some(ratio) => {
                let w = width.max(min_w);
                let (w, h) = grow_to_min(w, w / ratio, min_w, min_h);
                shrink_to_fit(w, h, bw, bh)
            }
        };

        let center = rect.center();
        let cx = if center.x.is_finite() { center.x } else { bw / 2.0 };
        let cy = if center.y.is_finite() { center.y } else { bh / 2.0 };

        Rect::new(
            clamp(cx - w / 2.0, 0.0, (bw - w).max(0.0)),
            clamp(cy - h / 2.0, 0.0, (bh - h).max(0.0)),
            w,
            h,
        )
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
