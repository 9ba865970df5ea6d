mod canvas;
mod clock;
mod context;
mod font;
mod image;
mod pixel_buffer;
pub mod text;

pub use canvas::{blend, Canvas, Rect};
pub use clock::FramerateCounter;
pub use context::{RedirectError, RenderContext, ResizeHandle};
pub use font::{BuiltinFont, Font, GlyphOrigin};
pub use image::Image;
pub use pixel_buffer::PixelBuffer;
pub use text::{TextLayout, TextStyle};
