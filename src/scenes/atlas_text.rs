use std::sync::Arc;

use super::common::{limit, Mover};
use crate::core::{BuiltinFont, Font};
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::math::{hsl_to_rgb, Color};
use crate::traits::{DynContext, Scene};

const LINES: [&str; 3] = ["FRAMEBUFFER", "GRAPHICS", "fbg demo"];

/// Words in an atlas font cut from the built-in glyphs, drawn over a
/// translucent background with a cycling hue, plus a frame-rate readout
pub struct AtlasTextScene {
    font: Arc<Font>,
    lines: Vec<Mover>,
    hue: f32,
}

impl AtlasTextScene {
    /// Build the font in `ctx` (it becomes current) and place the lines
    pub fn new(ctx: &mut DynContext) -> Result<Self> {
        let atlas = BuiltinFont::atlas(ctx.components())?;
        let font = ctx.create_font(
            atlas,
            BuiltinFont::GLYPH_WIDTH,
            BuiltinFont::GLYPH_HEIGHT,
            BuiltinFont::FIRST_CHAR,
        )?;
        ctx.set_font(Arc::clone(&font));
        ctx.text_colorkey(0);
        ctx.text_background(Color::rgb(0, 0, 64), 160);

        let mut rng = rand::thread_rng();
        let lines = LINES
            .iter()
            .map(|_| Mover::random(&mut rng, ctx.width() / 2, ctx.height().saturating_sub(8)))
            .collect();

        Ok(Self {
            font,
            lines,
            hue: 0.0,
        })
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }
}

impl Scene for AtlasTextScene {
    fn name(&self) -> &str {
        "atlas-text"
    }

    fn update(&mut self, frame: &FrameInfo, width: u32, height: u32) {
        self.hue = (self.hue + frame.delta * 90.0) % 360.0;

        let gh = self.font.glyph_height();
        for (line, pos) in LINES.iter().zip(&mut self.lines) {
            let w = line.len() as u32 * self.font.glyph_width();
            pos.bounce(limit(width, w), limit(height, gh));
        }
    }

    fn draw(&self, ctx: &mut DynContext) -> Result<()> {
        ctx.canvas().fade_down(24);

        ctx.text_color(hsl_to_rgb(self.hue, 0.8, 0.6));
        for (line, pos) in LINES.iter().zip(&self.lines) {
            ctx.write(line, pos.x, pos.y);
        }

        ctx.draw_framerate(Some(&self.font), 4, 4, Color::WHITE);
        Ok(())
    }
}
