use std::time::Instant;

/// Frame metadata handed to scenes - frame number and timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Iterator over demo frames
///
/// Endless by default; `with_limit` stops it after a fixed number of
/// frames. Use in a loop: `for frame in frames { ... }`
pub struct FrameIterator {
    frame_number: u64,
    limit: Option<u64>,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameIterator {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            limit: None,
            start_time: now,
            last_frame_time: now,
        }
    }

    /// Stop after `frames` frames
    pub fn with_limit(frames: u64) -> Self {
        Self {
            limit: Some(frames),
            ..Self::new()
        }
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        if self.limit.is_some_and(|limit| self.frame_number >= limit) {
            return None;
        }

        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        let time = now.duration_since(self.start_time).as_secs_f32();

        let info = FrameInfo::new(self.frame_number, time, delta);

        self.frame_number += 1;
        self.last_frame_time = now;

        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_numbered_in_order() {
        let numbers: Vec<u64> = FrameIterator::new().take(3).map(|f| f.number).collect();
        assert_eq!(numbers, vec![0, 1, 2]);
    }

    #[test]
    fn limited_iterator_stops() {
        let frames = FrameIterator::with_limit(5);
        assert_eq!(frames.count(), 5);
    }

    #[test]
    fn zero_limit_yields_nothing() {
        assert!(FrameIterator::with_limit(0).next().is_none());
    }
}
