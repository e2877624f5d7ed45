//! Owned RGBA pixel buffer.
//!
//! A `Canvas` is the explicit stand-in for a browser drawing surface: the
//! caller allocates one per upload, pipeline stages borrow it, and it is
//! dropped when the invocation ends.

use image::{imageops, Rgba, RgbaImage};

use crate::error::{Result, SigtrimError};

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A mutable, row-major RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Create a canvas filled with one colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    /// Wrap raw RGBA bytes. The length must be exactly `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        let actual = data.len();
        RgbaImage::from_raw(width, height, data)
            .map(|image| Self { image })
            .ok_or_else(|| SigtrimError::Decode {
                message: format!(
                    "pixel buffer for {}x{} needs {} bytes, got {}",
                    width, height, expected, actual
                ),
            })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Raw RGBA bytes, writable in place.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// Read one pixel. Panics if out of bounds, like `RgbaImage::get_pixel`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.image.put_pixel(x, y, Rgba(rgba));
    }

    /// Fill an axis-aligned rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, rgba: [u8; 4]) {
        let x_end = x.saturating_add(width).min(self.width());
        let y_end = y.saturating_add(height).min(self.height());
        for py in y..y_end {
            for px in x..x_end {
                self.put_pixel(px, py, rgba);
            }
        }
    }

    /// Copy a rectangle into a new canvas.
    ///
    /// The rectangle is clipped to this canvas, so the result may be
    /// smaller than `width` x `height`.
    pub fn region(&self, x: u32, y: u32, width: u32, height: u32) -> Canvas {
        Canvas::from(imageops::crop_imm(&self.image, x, y, width, height).to_image())
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl From<RgbaImage> for Canvas {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}
