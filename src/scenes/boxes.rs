use super::common::{limit, palette, Mover};
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::traits::{DynContext, Scene};

const BOX_COUNT: usize = 12;
const BOX_SIZE: u32 = 10;

/// Filled boxes bouncing off the screen edges
pub struct BoxesScene {
    boxes: Vec<Mover>,
}

impl BoxesScene {
    pub fn new(width: u32, height: u32) -> Self {
        let mut rng = rand::thread_rng();
        let boxes = (0..BOX_COUNT)
            .map(|_| Mover::random(&mut rng, width.saturating_sub(BOX_SIZE), height.saturating_sub(BOX_SIZE)))
            .collect();
        Self { boxes }
    }

    pub fn boxes(&self) -> &[Mover] {
        &self.boxes
    }
}

impl Scene for BoxesScene {
    fn name(&self) -> &str {
        "boxes"
    }

    fn update(&mut self, _frame: &FrameInfo, width: u32, height: u32) {
        let (lx, ly) = (limit(width, BOX_SIZE), limit(height, BOX_SIZE));
        for b in &mut self.boxes {
            b.bounce(lx, ly);
        }
    }

    fn draw(&self, ctx: &mut DynContext) -> Result<()> {
        ctx.canvas().clear(0);
        for (i, b) in self.boxes.iter().enumerate() {
            ctx.fill(palette(i + 1));
            ctx.canvas().filled_rect(b.x, b.y, BOX_SIZE, BOX_SIZE);
        }
        Ok(())
    }
}
