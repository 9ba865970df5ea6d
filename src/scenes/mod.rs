mod ascii;
mod atlas_text;
mod boxes;
mod common;
mod rain;
mod web;

pub use ascii::AsciiScene;
pub use atlas_text::AtlasTextScene;
pub use boxes::BoxesScene;
pub use common::Mover;
pub use rain::RainScene;
pub use web::WebScene;
