use super::pixel_buffer::PixelBuffer;
use crate::error::{FbgError, Result};

/// Caller-owned pixel rectangle drawn with the image primitives
///
/// Uses the same layout as the buffer it is drawn into, so the component
/// count must match the target's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pixels: PixelBuffer,
}

impl Image {
    /// Create a zero-filled image
    pub fn new(width: u32, height: u32, components: usize) -> Result<Self> {
        Ok(Self {
            pixels: PixelBuffer::allocate(width, height, components)?,
        })
    }

    /// Wrap raw bytes; `data` must hold exactly `width * height * components` bytes
    pub fn from_raw(width: u32, height: u32, components: usize, data: &[u8]) -> Result<Self> {
        let mut image = Self::new(width, height, components)?;
        if data.len() != image.pixels.size() {
            return Err(FbgError::OutOfBounds {
                index: data.len(),
                size: image.pixels.size(),
            });
        }
        image.pixels.as_bytes_mut().copy_from_slice(data);
        Ok(image)
    }

    /// Decode an encoded image (PNG, JPEG)
    ///
    /// No decoder is bundled; this always fails with `UnsupportedFormat`.
    pub fn from_memory(_data: &[u8], _components: usize) -> Result<Self> {
        Err(FbgError::UnsupportedFormat)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn components(&self) -> usize {
        self.pixels.components()
    }

    pub fn data(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixels.as_bytes_mut()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut PixelBuffer {
        &mut self.pixels
    }

    /// Reverse row order in place
    pub fn flip_vertical(&mut self) {
        let height = self.pixels.height() as usize;
        let line = self.pixels.line_length();
        let data = self.pixels.as_bytes_mut();

        for i in 0..height / 2 {
            let (top, bottom) = data.split_at_mut((height - 1 - i) * line);
            top[i * line..(i + 1) * line].swap_with_slice(&mut bottom[..line]);
        }
    }
}

impl From<PixelBuffer> for Image {
    fn from(pixels: PixelBuffer) -> Self {
        Self { pixels }
    }
}
