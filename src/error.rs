//! Error types for the rendering library.

use std::fmt;
use std::io;

/// Every fallible operation in the crate reports one of these locally.
#[derive(Debug)]
pub enum FbgError {
    /// Memory for a buffer, image or glyph table could not be obtained
    Allocation { bytes: usize },
    /// Raw indexed write outside `[0, size)`
    OutOfBounds { index: usize, size: usize },
    /// Checked pixel access outside the buffer
    PixelOutOfBounds { x: i32, y: i32, width: u32, height: u32 },
    /// `draw_into` called in the wrong state, or an operation that needs
    /// the display target was issued while redirected
    InvalidRedirectState { redirected: bool },
    /// Zero-sized buffer, image or resize request
    InvalidDimensions { width: u32, height: u32 },
    /// Only 3 (RGB) and 4 (RGB + pad) components are supported
    UnsupportedComponents(usize),
    /// Source pixels use a different component count than the target
    ComponentMismatch { expected: usize, found: usize },
    /// Redirect buffer shape differs from the back buffer
    SizeMismatch { expected: (u32, u32), found: (u32, u32) },
    /// Glyph cell is empty or larger than the atlas
    InvalidGlyphSize {
        glyph_width: u32,
        glyph_height: u32,
        atlas_width: u32,
        atlas_height: u32,
    },
    /// Encoded image decoding is not available
    UnsupportedFormat,
    Io(io::Error),
    Backend(String),
}

impl fmt::Display for FbgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FbgError::Allocation { bytes } => write!(f, "failed to allocate {} bytes", bytes),
            FbgError::OutOfBounds { index, size } => {
                write!(f, "index {} out of bounds for buffer of {} bytes", index, size)
            }
            FbgError::PixelOutOfBounds { x, y, width, height } => write!(
                f,
                "pixel ({}, {}) out of bounds for {}x{} buffer",
                x, y, width, height
            ),
            FbgError::InvalidRedirectState { redirected: true } => {
                write!(f, "context is already drawing into an external buffer")
            }
            FbgError::InvalidRedirectState { redirected: false } => {
                write!(f, "context is not drawing into an external buffer")
            }
            FbgError::InvalidDimensions { width, height } => {
                write!(f, "invalid dimensions {}x{}", width, height)
            }
            FbgError::UnsupportedComponents(n) => {
                write!(f, "unsupported component count {} (expected 3 or 4)", n)
            }
            FbgError::ComponentMismatch { expected, found } => write!(
                f,
                "component mismatch: target uses {}, source uses {}",
                expected, found
            ),
            FbgError::SizeMismatch { expected, found } => write!(
                f,
                "buffer size mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            FbgError::InvalidGlyphSize {
                glyph_width,
                glyph_height,
                atlas_width,
                atlas_height,
            } => write!(
                f,
                "glyph cell {}x{} does not fit a {}x{} atlas",
                glyph_width, glyph_height, atlas_width, atlas_height
            ),
            FbgError::UnsupportedFormat => write!(f, "image decoding is not supported"),
            FbgError::Io(e) => write!(f, "i/o error: {}", e),
            FbgError::Backend(msg) => write!(f, "backend error: {}", msg),
        }
    }
}

impl std::error::Error for FbgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FbgError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FbgError {
    fn from(err: io::Error) -> Self {
        FbgError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, FbgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_dimensions() {
        let err = FbgError::PixelOutOfBounds { x: 12, y: -1, width: 10, height: 10 };
        let msg = err.to_string();
        assert!(msg.contains("(12, -1)"));
        assert!(msg.contains("10x10"));
    }

    #[test]
    fn io_errors_keep_their_source() {
        use std::error::Error;

        let err: FbgError = io::Error::new(io::ErrorKind::NotFound, "no fb").into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("no fb"));
    }

    #[test]
    fn redirect_state_messages_differ() {
        let a = FbgError::InvalidRedirectState { redirected: true }.to_string();
        let b = FbgError::InvalidRedirectState { redirected: false }.to_string();
        assert_ne!(a, b);
    }
}
