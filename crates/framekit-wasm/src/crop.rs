//! WASM bindings for the interactive crop session.
//!
//! The core session is an immutable value; this wrapper holds the current
//! state and replaces it on every event so JavaScript can treat it as an
//! ordinary mutable object.

use crate::types::{interpolation, options_from_js, to_js_error, JsBitmap};
use framekit_core::{
    AspectConstraint, Bounds, CropSession, DisplayMapping, Interaction, Point, SelectionOptions,
};
use wasm_bindgen::prelude::*;

/// A crop selection being edited over one source image.
///
/// Pointer positions are in display pixels; the session converts them to
/// source units with the display scale given at construction.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const session = new JsCropSession(4000, 3000, 16 / 9, canvas.clientWidth / 4000, undefined);
/// canvas.onpointerdown = (e) => session.pointer_down(e.offsetX, e.offsetY);
/// canvas.onpointermove = (e) => session.pointer_move(e.offsetX, e.offsetY);
/// canvas.onpointerup = () => session.pointer_up();
/// const rect = session.rect(); // { x, y, width, height } in source pixels
/// ```
#[wasm_bindgen]
pub struct JsCropSession {
    session: CropSession,
    mapping: DisplayMapping,
}

/// A non-positive or non-finite ratio means a free-form selection.
fn aspect_from(ratio: Option<f64>) -> AspectConstraint {
    match ratio {
        Some(r) if r.is_finite() && r > 0.0 => AspectConstraint::Fixed(r),
        _ => AspectConstraint::Free,
    }
}

fn interaction_name(interaction: Interaction) -> &'static str {
    match interaction {
        Interaction::Idle => "idle",
        Interaction::Dragging => "dragging",
        Interaction::Resizing(_) => "resizing",
    }
}

#[wasm_bindgen]
impl JsCropSession {
    /// Start a full-frame session.
    ///
    /// # Arguments
    ///
    /// * `aspect_ratio` - Fixed `width / height`, or `undefined` for free-form
    /// * `display_scale` - Display pixels per source pixel
    /// * `options` - Optional `{ min_size, handle_tolerance }` in source units
    #[wasm_bindgen(constructor)]
    pub fn new(
        source_width: u32,
        source_height: u32,
        aspect_ratio: Option<f64>,
        display_scale: f64,
        options: JsValue,
    ) -> Result<JsCropSession, JsValue> {
        let options: SelectionOptions = options_from_js(options)?;
        Self::create(source_width, source_height, aspect_ratio, display_scale, options)
            .map_err(to_js_error)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        let point = self.to_source(x, y);
        self.session = self.session.pointer_down(point);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let point = self.to_source(x, y);
        self.session = self.session.pointer_move(point);
    }

    pub fn pointer_up(&mut self) {
        self.session = self.session.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.session = self.session.pointer_leave();
    }

    /// Change the display scale, e.g. after the canvas is resized.
    pub fn set_display_scale(&mut self, display_scale: f64) -> Result<(), JsValue> {
        self.mapping = DisplayMapping::new(display_scale).map_err(to_js_error)?;
        Ok(())
    }

    /// Switch the aspect ratio. Ignored while a gesture is in progress.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: Option<f64>) {
        self.session = self.session.set_aspect(aspect_from(aspect_ratio));
    }

    /// Rotate the frame by a step in degrees (typically ±90).
    pub fn rotate_by(&mut self, step_degrees: i32) {
        self.session = self.session.rotate_by(step_degrees);
    }

    /// Select the full frame for the current aspect ratio.
    pub fn reset(&mut self) {
        self.session = self.session.reset();
    }

    /// The selection as `{ x, y, width, height }` in source pixels.
    pub fn rect(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.rect())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// One of `idle`, `dragging`, `resizing`.
    #[wasm_bindgen(getter)]
    pub fn interaction(&self) -> String {
        interaction_name(self.session.interaction()).to_string()
    }

    /// Accumulated rotation in `[0, 360)`.
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> u32 {
        self.session.rotation().degrees()
    }

    /// Width of the (possibly rotated) frame the selection lives in.
    #[wasm_bindgen(getter)]
    pub fn frame_width(&self) -> f64 {
        self.session.bounds().width()
    }

    #[wasm_bindgen(getter)]
    pub fn frame_height(&self) -> f64 {
        self.session.bounds().height()
    }

    /// Produce the final cropped image from the source.
    pub fn extract(&self, source: &JsBitmap, use_lanczos: bool) -> Result<JsBitmap, JsValue> {
        self.session
            .extract_with(source.as_bitmap(), interpolation(use_lanczos))
            .map(JsBitmap::from_bitmap)
            .map_err(to_js_error)
    }
}

impl JsCropSession {
    fn create(
        source_width: u32,
        source_height: u32,
        aspect_ratio: Option<f64>,
        display_scale: f64,
        options: SelectionOptions,
    ) -> framekit_core::Result<Self> {
        let bounds = Bounds::from_dimensions(source_width, source_height)?;
        let aspect = aspect_from(aspect_ratio);
        let frame = framekit_core::selection::full_frame(bounds, aspect);
        Ok(Self {
            session: CropSession::with_options(bounds, frame, aspect, options),
            mapping: DisplayMapping::new(display_scale)?,
        })
    }

    fn to_source(&self, x: f64, y: f64) -> Point {
        self.mapping.to_source(Point::new(x, y))
    }
}
