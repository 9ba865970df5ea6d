use crate::core::{PixelBuffer, ResizeHandle};
use crate::error::Result;

/// How a backend handled a flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// The backend showed the back buffer itself; buffers stay where they are
    Presented,
    /// The backend has no present hook; the context swaps back and display
    Swap,
}

/// Display backend abstraction
///
/// A backend owns the device side of a render context: it is handed the
/// back buffer on every flip and told about size changes. Every hook has a
/// default so a backend only implements what it needs.
pub trait Backend {
    /// Short name for logging
    fn name(&self) -> &str {
        "backend"
    }

    /// Called at the start of every draw cycle, before pending resizes are applied
    ///
    /// Event pumping goes here; a size change observed by the backend is
    /// queued through `resize`.
    fn draw(&mut self, _resize: &ResizeHandle) -> Result<()> {
        Ok(())
    }

    /// Show the back buffer
    fn present(&mut self, _back: &PixelBuffer) -> Result<Presentation> {
        Ok(Presentation::Swap)
    }

    /// Reconfigure the device for a new size, before buffers are reallocated
    fn resize(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    /// Release device resources; called once when the context is dropped
    fn teardown(&mut self) {}
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn draw(&mut self, resize: &ResizeHandle) -> Result<()> {
        (**self).draw(resize)
    }

    fn present(&mut self, back: &PixelBuffer) -> Result<Presentation> {
        (**self).present(back)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        (**self).resize(width, height)
    }

    fn teardown(&mut self) {
        (**self).teardown()
    }
}
