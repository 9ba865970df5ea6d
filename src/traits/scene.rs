use crate::core::RenderContext;
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::traits::Backend;

/// Context type scenes draw into; the backend is picked at runtime
pub type DynContext = RenderContext<Box<dyn Backend>>;

/// Animated demo scene
///
/// State lives in the implementing struct. `update` advances it for a
/// frame on a `width x height` target, `draw` renders it into the back
/// buffer.
pub trait Scene {
    /// Get scene name for logging
    fn name(&self) -> &str;

    /// Advance animation state
    fn update(&mut self, frame: &FrameInfo, width: u32, height: u32);

    /// Render current state
    fn draw(&self, ctx: &mut DynContext) -> Result<()>;
}
