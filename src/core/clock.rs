use std::time::{Duration, Instant};

/// Frames-per-second counter over one-second windows
///
/// Counts frames until a second has passed since the window started, then
/// publishes the count as the current rate and starts a new window.
#[derive(Debug)]
pub struct FramerateCounter {
    window_start: Instant,
    frames: u32,
    fps: u32,
    fps_text: String,
}

impl FramerateCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    /// Create counter with its first window starting now
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            window_start: start,
            frames: 0,
            fps: 0,
            fps_text: String::from("0"),
        }
    }

    /// Count one frame
    pub fn tick(&mut self, update_text: bool) {
        self.tick_at(Instant::now(), update_text);
    }

    /// Count one frame presented at `now`
    ///
    /// When the window is over, the rate becomes the number of frames
    /// counted in it. `update_text` also refreshes the decimal string.
    pub fn tick_at(&mut self, now: Instant, update_text: bool) {
        if now.saturating_duration_since(self.window_start) >= Self::WINDOW {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = now;

            if update_text {
                self.fps_text = self.fps.to_string();
            }
        }

        self.frames += 1;
    }

    /// Frames counted in the last completed window
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames counted so far in the current window
    pub fn frames_in_window(&self) -> u32 {
        self.frames
    }

    /// Decimal rendering of the last published rate
    pub fn fps_text(&self) -> &str {
        &self.fps_text
    }
}

impl Default for FramerateCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_published_after_a_second() {
        let start = Instant::now();
        let mut counter = FramerateCounter::starting_at(start);

        for i in 0..30 {
            counter.tick_at(start + Duration::from_millis(i * 30), true);
        }
        assert_eq!(counter.fps(), 0);

        counter.tick_at(start + Duration::from_millis(1000), true);
        assert_eq!(counter.fps(), 30);
        assert_eq!(counter.fps_text(), "30");
        assert_eq!(counter.frames_in_window(), 1);
    }

    #[test]
    fn text_left_alone_when_not_requested() {
        let start = Instant::now();
        let mut counter = FramerateCounter::starting_at(start);

        counter.tick_at(start, false);
        counter.tick_at(start + Duration::from_secs(1), false);
        assert_eq!(counter.fps(), 1);
        assert_eq!(counter.fps_text(), "0");
    }
}
