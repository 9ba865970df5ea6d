use super::common::{limit, Mover};
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::math::Color;
use crate::traits::{DynContext, Scene};

const POINT_COUNT: usize = 10;
const POINT_SIZE: u32 = 2;

/// Bouncing points with every pair joined by a line
pub struct WebScene {
    points: Vec<Mover>,
}

impl WebScene {
    pub fn new(width: u32, height: u32) -> Self {
        let mut rng = rand::thread_rng();
        let points = (0..POINT_COUNT)
            .map(|_| Mover::random(&mut rng, width.saturating_sub(POINT_SIZE), height.saturating_sub(POINT_SIZE)))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[Mover] {
        &self.points
    }
}

impl Scene for WebScene {
    fn name(&self) -> &str {
        "web"
    }

    fn update(&mut self, _frame: &FrameInfo, width: u32, height: u32) {
        let (lx, ly) = (limit(width, POINT_SIZE), limit(height, POINT_SIZE));
        for p in &mut self.points {
            p.bounce(lx, ly);
        }
    }

    fn draw(&self, ctx: &mut DynContext) -> Result<()> {
        let mut canvas = ctx.canvas();
        canvas.clear(0);

        for (j, a) in self.points.iter().enumerate() {
            for (k, b) in self.points.iter().enumerate() {
                let color = Color::rgb(
                    ((j * 15) % 255) as u8,
                    ((k * 25) % 255) as u8,
                    (((j + k) * 35) % 255) as u8,
                );
                canvas.line(a.x + 1, a.y + 1, b.x + 1, b.y + 1, color);
            }
        }
        Ok(())
    }
}
