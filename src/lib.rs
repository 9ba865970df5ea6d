pub mod backends;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod frame;
pub mod math;
pub mod scenes;
pub mod traits;

pub use crate::core::{
    Canvas, Font, Image, PixelBuffer, Rect, RedirectError, RenderContext, ResizeHandle, TextStyle,
};
pub use crate::error::{FbgError, Result};
pub use crate::math::Color;
pub use crate::traits::{Backend, Presentation};
