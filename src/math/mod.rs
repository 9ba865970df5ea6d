mod color;
mod random;

pub use color::{hsl_to_rgb, rgb_to_hsl, Color, Hsl};
pub use random::randf;
