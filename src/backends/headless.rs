use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::{PixelBuffer, ResizeHandle};
use crate::error::Result;
use crate::traits::{Backend, Presentation};

/// In-memory backend for tests and display-less runs
///
/// Records every hook call. By default it leaves presentation to the
/// context's buffer swap; `capturing` makes it present by copying the back
/// buffer instead.
#[derive(Debug, Default)]
pub struct Headless {
    capture: bool,
    draws: u64,
    presents: u64,
    resizes: Vec<(u32, u32)>,
    last_frame: Option<Vec<u8>>,
    queued_resize: Option<(u32, u32)>,
    torn_down: Arc<AtomicBool>,
}

impl Headless {
    /// Backend without a present hook
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that presents by copying the back buffer
    pub fn capturing() -> Self {
        Self {
            capture: true,
            ..Self::default()
        }
    }

    /// Report a size change from the "device" during the next draw hook
    pub fn queue_resize(&mut self, width: u32, height: u32) {
        self.queued_resize = Some((width, height));
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Calls to the present hook, swapped or captured
    pub fn presents(&self) -> u64 {
        self.presents
    }

    /// Sizes passed to the resize hook, in call order
    pub fn resizes(&self) -> &[(u32, u32)] {
        &self.resizes
    }

    /// Bytes of the last presented frame, when capturing
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.last_frame.as_deref()
    }

    /// Flag set by `teardown`, readable after the backend is gone
    pub fn teardown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.torn_down)
    }
}

impl Backend for Headless {
    fn name(&self) -> &str {
        "headless"
    }

    fn draw(&mut self, resize: &ResizeHandle) -> Result<()> {
        self.draws += 1;
        if let Some((w, h)) = self.queued_resize.take() {
            resize.push(w, h);
        }
        Ok(())
    }

    fn present(&mut self, back: &PixelBuffer) -> Result<Presentation> {
        self.presents += 1;
        if !self.capture {
            return Ok(Presentation::Swap);
        }

        let frame = self.last_frame.get_or_insert_with(Vec::new);
        frame.clear();
        frame.extend_from_slice(back.as_bytes());
        Ok(Presentation::Presented)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.resizes.push((width, height));
        Ok(())
    }

    fn teardown(&mut self) {
        self.torn_down.store(true, Ordering::Release);
    }
}
