use super::common::{limit, Mover};
use crate::core::BuiltinFont;
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::math::Color;
use crate::traits::{DynContext, Scene};

const WORD_COUNT: usize = 10;

/// Copies of one word in the built-in font, each drawn one scale step
/// larger than the previous and bouncing inside the screen
pub struct AsciiScene {
    word: String,
    words: Vec<Mover>,
}

impl AsciiScene {
    pub fn new(width: u32, height: u32, word: impl Into<String>) -> Self {
        let mut rng = rand::thread_rng();
        let words = (0..WORD_COUNT)
            .map(|_| Mover::random(&mut rng, width.saturating_sub(2), height.saturating_sub(2)))
            .collect();
        Self {
            word: word.into(),
            words,
        }
    }

    /// Pixel size of the word at `scale`
    fn extent(&self, scale: u32) -> (u32, u32) {
        let glyphs = self.word.chars().count() as u32;
        (
            glyphs * BuiltinFont::GLYPH_WIDTH * scale,
            BuiltinFont::GLYPH_HEIGHT * scale,
        )
    }

    pub fn positions(&self) -> &[Mover] {
        &self.words
    }
}

impl Scene for AsciiScene {
    fn name(&self) -> &str {
        "ascii"
    }

    fn update(&mut self, _frame: &FrameInfo, width: u32, height: u32) {
        for n in 0..self.words.len() {
            let (w, h) = self.extent(n as u32 + 1);
            self.words[n].bounce(limit(width, w), limit(height, h));
        }
    }

    fn draw(&self, ctx: &mut DynContext) -> Result<()> {
        ctx.canvas().clear(0);
        for (n, pos) in self.words.iter().enumerate() {
            let color = Color::rgb(
                ((n * 15) % 255) as u8,
                (((WORD_COUNT - n) * 25) % 255) as u8,
                ((n * 35) % 255) as u8,
            );
            ctx.text_simple_scaled(&self.word, pos.x, pos.y, n as u32 + 1, color);
        }
        Ok(())
    }
}
