//! The decoded pixel buffer every engine operation reads from.

use image::{Rgb, RgbImage};

use crate::error::{EngineError, Result};

/// An immutable RGB image with non-zero dimensions.
///
/// Operations never mutate a `Bitmap`; each one returns a new buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    image: RgbImage,
}

impl Bitmap {
    /// Create a bitmap from RGB pixel data in row-major order (3 bytes per pixel).
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }

        let expected = (width as usize) * (height as usize) * 3;
        let actual = pixels.len();
        if actual != expected {
            return Err(EngineError::InvalidPixelData { expected, actual });
        }

        RgbImage::from_raw(width, height, pixels)
            .map(|image| Self { image })
            .ok_or(EngineError::InvalidPixelData { expected, actual })
    }

    /// Create a bitmap filled with a single color.
    pub fn solid(width: u32, height: u32, color: [u8; 3]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self {
            image: RgbImage::from_pixel(width, height, Rgb(color)),
        })
    }

    /// Wrap an `image::RgbImage`.
    pub fn from_rgb_image(image: RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self { image })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Dimensions as `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// RGB pixel data in row-major order.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Color at `(x, y)`, or `None` outside the bitmap.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Color at a position the caller has already bounds-checked.
    #[inline]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    /// Borrow the underlying buffer for `image::imageops` calls.
    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_rgb_image(self) -> RgbImage {
        self.image
    }

    /// Consume the bitmap and return its raw pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.image.into_raw()
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Returns the single color of the image if every pixel matches it.
    pub fn uniform_color(&self) -> Option<[u8; 3]> {
        let mut pixels = self.image.pixels();
        let first = pixels.next()?.0;
        pixels.all(|p| p.0 == first).then_some(first)
    }
}
