use rand::Rng;

use crate::math::Color;

/// Point moving at a constant integer velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mover {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl Mover {
    /// Random position in `[0, max_x) x [0, max_y)` and speed in 1..=10 per axis
    pub fn random(rng: &mut impl Rng, max_x: u32, max_y: u32) -> Self {
        Self {
            x: rng.gen_range(0..max_x.max(1)) as i32,
            y: rng.gen_range(0..max_y.max(1)) as i32,
            dx: rng.gen_range(1..=10),
            dy: rng.gen_range(1..=10),
        }
    }

    /// Step once, reversing an axis that leaves `[0, limit]`
    ///
    /// A reversed axis backs off by twice the new velocity and is then
    /// clamped, so the point is inside again after the step (also when the
    /// limits shrank under it).
    pub fn bounce(&mut self, limit_x: i32, limit_y: i32) {
        self.x += self.dx;
        self.y += self.dy;

        if self.x < 0 || self.x > limit_x {
            self.dx = if self.x < 0 { self.dx.abs() } else { -self.dx.abs() };
            self.x = (self.x + 2 * self.dx).clamp(0, limit_x.max(0));
        }
        if self.y < 0 || self.y > limit_y {
            self.dy = if self.y < 0 { self.dy.abs() } else { -self.dy.abs() };
            self.y = (self.y + 2 * self.dy).clamp(0, limit_y.max(0));
        }
    }
}

/// Fixed palette color for element `i`
pub fn palette(i: usize) -> Color {
    Color::rgb(
        ((i * 17) % 255) as u8,
        ((i * 29) % 255) as u8,
        ((i * 37) % 255) as u8,
    )
}

/// Clamp a buffer dimension minus an element size to a usable limit
pub fn limit(extent: u32, size: u32) -> i32 {
    extent.saturating_sub(size).min(i32::MAX as u32) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounce_reverses_at_edge() {
        let mut m = Mover { x: 95, y: 10, dx: 10, dy: 1 };
        m.bounce(100, 100);
        assert_eq!(m.dx, -10);
        assert_eq!(m.x, 85);
        assert_eq!(m.y, 11);
    }

    #[test]
    fn bounce_reverses_below_zero() {
        let mut m = Mover { x: 2, y: 2, dx: -5, dy: -5 };
        m.bounce(100, 100);
        assert_eq!((m.x, m.y), (7, 7));
        assert_eq!((m.dx, m.dy), (5, 5));
    }

    #[test]
    fn bounce_recovers_after_shrink() {
        let mut m = Mover { x: 90, y: 90, dx: 3, dy: -3 };
        m.bounce(20, 20);
        assert_eq!((m.x, m.y), (20, 20));
        assert!(m.dx < 0 && m.dy < 0);
        m.bounce(20, 20);
        assert_eq!((m.x, m.y), (17, 17));
    }

    #[test]
    fn random_stays_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let m = Mover::random(&mut rng, 50, 20);
            assert!((0..50).contains(&m.x) && (0..20).contains(&m.y));
            assert!((1..=10).contains(&m.dx) && (1..=10).contains(&m.dy));
        }
    }
}
