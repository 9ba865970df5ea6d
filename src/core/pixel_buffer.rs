use crate::error::{FbgError, Result};

/// Raw storage for one frame
///
/// Row-major, components interleaved (R, G, B[, pad]). The byte vector
/// always holds exactly `width * height * components` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    components: usize,
    data: Vec<u8>,
}

/// Validate a component count (3 = RGB, 4 = RGB + pad byte)
pub(crate) fn check_components(components: usize) -> Result<()> {
    match components {
        3 | 4 => Ok(()),
        n => Err(FbgError::UnsupportedComponents(n)),
    }
}

/// Allocate `size` zeroed bytes, reporting exhaustion instead of aborting
pub(crate) fn zeroed_bytes(size: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(size)
        .map_err(|_| FbgError::Allocation { bytes: size })?;
    data.resize(size, 0);
    Ok(data)
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer
    pub fn allocate(width: u32, height: u32, components: usize) -> Result<Self> {
        check_components(components)?;
        if width == 0 || height == 0 {
            return Err(FbgError::InvalidDimensions { width, height });
        }

        let size = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(components))
            .ok_or(FbgError::Allocation { bytes: usize::MAX })?;

        Ok(Self {
            width,
            height,
            components,
            data: zeroed_bytes(size)?,
        })
    }

    /// Allocate a new zero-filled buffer with the same component count
    ///
    /// `self` is left untouched whether or not the allocation succeeds.
    pub fn resized(&self, new_width: u32, new_height: u32) -> Result<Self> {
        Self::allocate(new_width, new_height, self.components)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn components(&self) -> usize {
        self.components
    }

    /// Bytes per row
    pub fn line_length(&self) -> usize {
        self.width as usize * self.components
    }

    /// Total bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// True if (x, y) addresses a pixel of this buffer
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Byte offset of pixel (x, y), bounds checked
    pub fn offset(&self, x: i32, y: i32) -> Result<usize> {
        if !self.contains(x, y) {
            return Err(FbgError::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.offset_trusted(x as u32, y as u32))
    }

    /// Byte offset of pixel (x, y) without validation
    ///
    /// For hot loops that clipped their coordinates beforehand. A bad
    /// coordinate yields an offset past the end and the following slice
    /// access panics.
    #[inline]
    pub fn offset_trusted(&self, x: u32, y: u32) -> usize {
        y as usize * self.line_length() + x as usize * self.components
    }

    /// Write one byte at a linear index
    pub fn plot(&mut self, index: usize, value: u8) -> Result<()> {
        let size = self.data.len();
        match self.data.get_mut(index) {
            Some(byte) => {
                *byte = value;
                Ok(())
            }
            None => Err(FbgError::OutOfBounds { index, size }),
        }
    }

    /// The `components` bytes of pixel (x, y)
    pub fn pixel_bytes(&self, x: i32, y: i32) -> Result<&[u8]> {
        let ofs = self.offset(x, y)?;
        Ok(&self.data[ofs..ofs + self.components])
    }

    /// Bytes of row `y`
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.line_length();
        &self.data[start..start + self.line_length()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let len = self.line_length();
        let start = y as usize * len;
        &mut self.data[start..start + len]
    }

    /// Set every byte, pad bytes included
    pub fn fill_bytes(&mut self, value: u8) {
        self.data.fill(value);
    }

    /// True if `other` has the same width, height and component count
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.components == other.components
    }
}
