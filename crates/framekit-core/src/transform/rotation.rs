//! Whole-image rotation: exact quarter turns and interpolated arbitrary angles.
//!
//! Quarter turns (90°, 180°, 270°) are pixel permutations and never resample.
//! Any other angle rotates about the image center onto a canvas expanded to
//! the rotated bounding box, using inverse mapping: for each output pixel
//! center we find the source position and interpolate there.
//!
//! For a clockwise rotation by θ (y axis pointing down), the inverse transform is:
//! ```text
//! src_x = dx * cos(-θ) - dy * sin(-θ) + src_cx
//! src_y = dx * sin(-θ) + dy * cos(-θ) + src_cy
//! ```
//! where `(dx, dy)` is the output pixel center relative to the output center.

use image::imageops;
use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::error::Result;

/// Interpolation filter for arbitrary-angle rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation - good for preview rendering.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

/// A rotation in whole degrees, normalized to `[0, 360)`.
///
/// Positive values rotate clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Rotation(u16);

impl Rotation {
    pub const NONE: Rotation = Rotation(0);

    pub fn new(degrees: i32) -> Self {
        Rotation(degrees.rem_euclid(360) as u16)
    }

    /// Normalized degrees in `[0, 360)`.
    #[inline]
    pub fn degrees(self) -> u32 {
        self.0 as u32
    }

    /// Accumulate a step (e.g. `+90` or `-90`).
    #[must_use]
    pub fn step(self, delta_degrees: i32) -> Self {
        Rotation::new(self.0 as i32 + delta_degrees)
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_quarter_turn(self) -> bool {
        self.0 % 90 == 0
    }

    /// Returns true for 90° and 270°, which exchange width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        self.0 == 90 || self.0 == 270
    }
}

impl From<i32> for Rotation {
    fn from(degrees: i32) -> Self {
        Rotation::new(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.0 as i32
    }
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// Quarter turns are exact; other angles use
/// `new_w = |w*cos| + |h*sin|`, `new_h = |w*sin| + |h*cos|`, rounded.
pub fn compute_rotated_bounds(width: u32, height: u32, rotation: Rotation) -> (u32, u32) {
    match rotation.degrees() {
        0 | 180 => return (width, height),
        90 | 270 => return (height, width),
        _ => {}
    }

    let angle_rad = (rotation.degrees() as f64).to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate a whole bitmap about its center.
///
/// The output canvas fits the entire rotated image (no clipping). Areas of the
/// expanded canvas outside the source are black.
pub fn apply_rotation(
    image: &Bitmap,
    rotation: Rotation,
    filter: InterpolationFilter,
) -> Result<Bitmap> {
    let src = image.as_rgb_image();
    match rotation.degrees() {
        0 => Ok(image.clone()),
        90 => Bitmap::from_rgb_image(imageops::rotate90(src)),
        180 => Bitmap::from_rgb_image(imageops::rotate180(src)),
        270 => Bitmap::from_rgb_image(imageops::rotate270(src)),
        _ => rotate_affine(image, rotation, filter),
    }
}

fn rotate_affine(image: &Bitmap, rotation: Rotation, filter: InterpolationFilter) -> Result<Bitmap> {
    let (src_w, src_h) = (image.width() as f64, image.height() as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width(), image.height(), rotation);

    let angle_rad = -(rotation.degrees() as f64).to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = vec![0u8; (dst_w as usize) * (dst_h as usize) * 3];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Back to pixel-index space (centers at integer coordinates)
            let src_x = dx * cos - dy * sin + src_cx - 0.5;
            let src_y = dx * sin + dy * cos + src_cy - 0.5;

            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y),
            };

            let dst_idx = ((dst_y as usize) * (dst_w as usize) + dst_x as usize) * 3;
            output[dst_idx..dst_idx + 3].copy_from_slice(&pixel);
        }
    }

    Bitmap::new(dst_w, dst_h, output)
}

#[inline]
fn get_pixel_f64(image: &Bitmap, px: u32, py: u32) -> [f64; 3] {
    let [r, g, b] = image.pixel(px, py);
    [r as f64, g as f64, b as f64]
}

/// Sample a pixel using bilinear interpolation.
///
/// Positions within half a pixel of the edge clamp to the edge pixels;
/// positions further out are black.
fn sample_bilinear(image: &Bitmap, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (image.width() as f64, image.height() as f64);

    if x < -0.5 || x > w - 0.5 || y < -0.5 || y > h - 0.5 {
        return [0, 0, 0];
    }

    let x = x.clamp(0.0, w - 1.0);
    let y = y.clamp(0.0, h - 1.0);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width() - 1);
    let y1 = (y0 + 1).min(image.height() - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation over a 6x6 neighborhood.
///
/// Falls back to bilinear near the edges where the kernel would leave the image.
fn sample_lanczos3(image: &Bitmap, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (image.width() as i64, image.height() as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            let pixel = get_pixel_f64(image, px as u32, py as u32);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum > 0.0 {
        for i in 0..3 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel: `sinc(x) * sinc(x/a)` for `|x| < a`, zero beyond.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
