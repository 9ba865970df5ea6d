use rand::Rng;

use crate::error::Result;
use crate::frame::FrameInfo;
use crate::math::Color;
use crate::traits::{DynContext, Scene};

const LINE_COUNT: usize = 10;

/// Full-width horizontal lines falling and wrapping to the top
pub struct RainScene {
    lines: Vec<(i32, i32)>,
}

impl RainScene {
    pub fn new(_width: u32, height: u32) -> Self {
        let mut rng = rand::thread_rng();
        let lines = (0..LINE_COUNT)
            .map(|_| (rng.gen_range(0..height.max(1)) as i32, rng.gen_range(1..=10)))
            .collect();
        Self { lines }
    }

    /// Current row of each line
    pub fn rows(&self) -> impl Iterator<Item = i32> + '_ {
        self.lines.iter().map(|&(y, _)| y)
    }
}

impl Scene for RainScene {
    fn name(&self) -> &str {
        "rain"
    }

    fn update(&mut self, _frame: &FrameInfo, _width: u32, height: u32) {
        let bottom = height.saturating_sub(1).min(i32::MAX as u32) as i32;
        for (y, speed) in &mut self.lines {
            *y += *speed;
            if *y > bottom {
                *y = 0;
            }
        }
    }

    fn draw(&self, ctx: &mut DynContext) -> Result<()> {
        let width = ctx.width();
        let mut canvas = ctx.canvas();
        canvas.clear(0);
        for y in self.rows() {
            canvas.hline(0, y, width, Color::WHITE);
        }
        Ok(())
    }
}
