use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::canvas::Canvas;
use super::clock::FramerateCounter;
use super::font::Font;
use super::image::Image;
use super::pixel_buffer::{check_components, PixelBuffer};
use super::text::{self, TextStyle};
use crate::config::ContextConfig;
use crate::error::{FbgError, Result};
use crate::math::Color;
use crate::traits::{Backend, Presentation};

/// A `draw_into` call the context refused
///
/// Holds the caller's buffer when one was passed in, so a refused buffer
/// is never dropped behind the caller's back.
#[derive(Debug)]
pub struct RedirectError {
    pub error: FbgError,
    pub buffer: Option<PixelBuffer>,
}

impl RedirectError {
    fn refused(error: FbgError, buffer: PixelBuffer) -> Self {
        Self { error, buffer: Some(buffer) }
    }

    /// Take the returned buffer, if any
    pub fn into_buffer(self) -> Option<PixelBuffer> {
        self.buffer
    }
}

impl From<FbgError> for RedirectError {
    fn from(error: FbgError) -> Self {
        Self { error, buffer: None }
    }
}

impl From<RedirectError> for FbgError {
    fn from(err: RedirectError) -> Self {
        err.error
    }
}

impl fmt::Display for RedirectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for RedirectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Thread-safe slot for a deferred resize request
///
/// Width and height share one atomic word, so a reader never sees one
/// half of a request paired with a stale other half. A later request
/// replaces an unapplied earlier one.
#[derive(Debug, Clone, Default)]
pub struct ResizeHandle {
    pending: Arc<AtomicU64>,
}

impl ResizeHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a resize for the next draw cycle; zero dimensions are ignored
    pub fn push(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.pending
            .store(((width as u64) << 32) | height as u64, Ordering::Release);
    }

    /// Pending request, if any, without consuming it
    pub fn pending(&self) -> Option<(u32, u32)> {
        Self::unpack(self.pending.load(Ordering::Acquire))
    }

    /// Remove and return the pending request
    pub fn take(&self) -> Option<(u32, u32)> {
        Self::unpack(self.pending.swap(0, Ordering::AcqRel))
    }

    fn unpack(word: u64) -> Option<(u32, u32)> {
        if word == 0 {
            return None;
        }
        Some(((word >> 32) as u32, word as u32))
    }
}

type ResizeCallback = Box<dyn FnMut(u32, u32)>;

/// Render context: buffers, draw state and the backend presenting them
///
/// All drawing targets the back buffer. `flip` hands it to the backend or
/// swaps it with the display buffer. While a caller-supplied buffer is
/// installed with `draw_into`, the context is redirected: the regular back
/// buffer is stashed and size changes and flips are refused.
pub struct RenderContext<B: Backend> {
    back: PixelBuffer,
    display: PixelBuffer,
    temp: Option<PixelBuffer>,

    fill: Color,
    text_style: TextStyle,
    current_font: Option<Arc<Font>>,

    resize_handle: ResizeHandle,
    allow_resizing: bool,
    resize_callback: Option<ResizeCallback>,

    framerate: FramerateCounter,
    backend: B,
}

impl<B: Backend> RenderContext<B> {
    /// Create context with zeroed back and display buffers
    pub fn new(width: u32, height: u32, components: usize, allow_resizing: bool, backend: B) -> Result<Self> {
        check_components(components)?;
        let back = PixelBuffer::allocate(width, height, components)?;
        let display = PixelBuffer::allocate(width, height, components)?;

        log::info!(
            "render context {}x{}x{} on {} backend",
            width,
            height,
            components,
            backend.name()
        );

        Ok(Self {
            back,
            display,
            temp: None,
            fill: Color::BLACK,
            text_style: TextStyle::default(),
            current_font: None,
            resize_handle: ResizeHandle::new(),
            allow_resizing,
            resize_callback: None,
            framerate: FramerateCounter::new(),
            backend,
        })
    }

    pub fn with_config(config: &ContextConfig, backend: B) -> Result<Self> {
        Self::new(
            config.width,
            config.height,
            config.components,
            config.allow_resizing,
            backend,
        )
    }

    pub fn width(&self) -> u32 {
        self.back.width()
    }

    pub fn height(&self) -> u32 {
        self.back.height()
    }

    pub fn components(&self) -> usize {
        self.back.components()
    }

    pub fn allow_resizing(&self) -> bool {
        self.allow_resizing
    }

    /// Canvas over the active back buffer, using the current fill color
    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(&mut self.back, self.fill)
    }

    pub fn back_buffer(&self) -> &PixelBuffer {
        &self.back
    }

    pub fn display_buffer(&self) -> &PixelBuffer {
        &self.display
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_redirected(&self) -> bool {
        self.temp.is_some()
    }

    // === Frame cycle ===

    /// Start a draw cycle
    ///
    /// Runs the backend draw hook, then applies a pending resize. While
    /// redirected the request stays queued for a later cycle.
    pub fn draw(&mut self) -> Result<()> {
        self.backend.draw(&self.resize_handle)?;

        if self.is_redirected() {
            if let Some((w, h)) = self.resize_handle.pending() {
                log::debug!("resize to {}x{} deferred while redirected", w, h);
            }
            return Ok(());
        }

        if let Some((w, h)) = self.resize_handle.take() {
            self.resize(w, h)?;
        }
        Ok(())
    }

    /// Resize immediately
    ///
    /// The backend hook always runs. Buffers are reallocated only when
    /// resizing is allowed, and both new buffers exist before either old
    /// one is released. The resize callback fires in both cases with the
    /// requested size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if self.is_redirected() {
            log::warn!("resize to {}x{} refused while redirected", width, height);
            return Err(FbgError::InvalidRedirectState { redirected: true });
        }

        self.backend.resize(width, height)?;

        if self.allow_resizing {
            let back = self.back.resized(width, height)?;
            let display = self.display.resized(width, height)?;
            self.back = back;
            self.display = display;
            log::debug!("buffers resized to {}x{}", width, height);
        }

        if let Some(callback) = self.resize_callback.as_mut() {
            callback(width, height);
        }
        Ok(())
    }

    /// Queue a resize for the next `draw`
    pub fn push_resize(&self, width: u32, height: u32) {
        self.resize_handle.push(width, height);
    }

    /// Handle other threads can use to queue resizes
    pub fn resize_handle(&self) -> ResizeHandle {
        self.resize_handle.clone()
    }

    /// Register a callback fired after every resize request
    pub fn on_resize(&mut self, callback: impl FnMut(u32, u32) + 'static) {
        self.resize_callback = Some(Box::new(callback));
    }

    /// Present the back buffer and count the frame
    pub fn flip(&mut self) -> Result<()> {
        if self.is_redirected() {
            return Err(FbgError::InvalidRedirectState { redirected: true });
        }

        match self.backend.present(&self.back)? {
            Presentation::Presented => {}
            Presentation::Swap => mem::swap(&mut self.back, &mut self.display),
        }

        self.compute_framerate(true);
        Ok(())
    }

    /// Install `Some(buffer)` as the draw target, or restore the regular back buffer with `None`
    ///
    /// Installing returns `Ok(None)`. Restoring hands the caller's buffer
    /// back. Installing while redirected, or restoring while not, fails with
    /// `InvalidRedirectState` and leaves the context unchanged. A refused
    /// buffer comes back inside the `RedirectError`.
    pub fn draw_into(
        &mut self,
        buffer: Option<PixelBuffer>,
    ) -> std::result::Result<Option<PixelBuffer>, RedirectError> {
        match (buffer, self.temp.take()) {
            (Some(buffer), None) => {
                if buffer.components() != self.back.components() {
                    let error = FbgError::ComponentMismatch {
                        expected: self.back.components(),
                        found: buffer.components(),
                    };
                    return Err(RedirectError::refused(error, buffer));
                }
                if buffer.dimensions() != self.back.dimensions() {
                    let error = FbgError::SizeMismatch {
                        expected: self.back.dimensions(),
                        found: buffer.dimensions(),
                    };
                    return Err(RedirectError::refused(error, buffer));
                }
                self.temp = Some(mem::replace(&mut self.back, buffer));
                log::debug!("drawing redirected to caller buffer");
                Ok(None)
            }
            (None, Some(stashed)) => {
                log::debug!("drawing restored to back buffer");
                Ok(Some(mem::replace(&mut self.back, stashed)))
            }
            (Some(buffer), stashed @ Some(_)) => {
                self.temp = stashed;
                let error = FbgError::InvalidRedirectState { redirected: true };
                Err(RedirectError::refused(error, buffer))
            }
            (None, None) => Err(FbgError::InvalidRedirectState { redirected: false }.into()),
        }
    }

    // === Frame rate ===

    /// Count a frame; see `FramerateCounter::tick`
    pub fn compute_framerate(&mut self, update_text: bool) {
        let before = self.framerate.fps();
        self.framerate.tick(update_text);
        if self.framerate.fps() != before {
            log::trace!("framerate {}", self.framerate.fps());
        }
    }

    pub fn framerate(&self) -> u32 {
        self.framerate.fps()
    }

    pub fn framerate_text(&self) -> &str {
        self.framerate.fps_text()
    }

    /// Draw the frame rate string
    ///
    /// Uses `font`, else the current font, else the built-in font.
    pub fn draw_framerate(&mut self, font: Option<&Font>, x: i32, y: i32, color: Color) {
        let current = self.current_font.clone();
        let style = TextStyle {
            color,
            ..self.text_style
        };
        let mut canvas = Canvas::new(&mut self.back, self.fill);
        let fps = self.framerate.fps_text();

        match font.or(current.as_deref()) {
            Some(font) => text::draw_text(&mut canvas, font, fps, x, y, &style),
            None => text::draw_text_simple(&mut canvas, fps, x, y, color),
        }
    }

    // === Draw state ===

    pub fn fill(&mut self, color: Color) {
        self.fill = color;
    }

    pub fn fill_color(&self) -> Color {
        self.fill
    }

    pub fn text_color(&mut self, color: Color) {
        self.text_style.color = color;
    }

    /// Background blended behind atlas text with `alpha`
    pub fn text_background(&mut self, color: Color, alpha: u8) {
        self.text_style.background = color.with_alpha(alpha);
    }

    pub fn text_colorkey(&mut self, value: u8) {
        self.text_style.colorkey = value;
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    pub fn set_font(&mut self, font: Arc<Font>) {
        self.current_font = Some(font);
    }

    pub fn current_font(&self) -> Option<&Arc<Font>> {
        self.current_font.as_ref()
    }

    // === Fonts, images, text ===

    /// Build a font from `atlas`; the first font created becomes current
    pub fn create_font(&mut self, atlas: Image, glyph_width: u32, glyph_height: u32, first_char: u8) -> Result<Arc<Font>> {
        let font = Arc::new(Font::new(atlas, glyph_width, glyph_height, first_char)?);
        if self.current_font.is_none() {
            self.current_font = Some(Arc::clone(&font));
        }
        Ok(font)
    }

    /// Zeroed image in this context's pixel format
    pub fn create_image(&self, width: u32, height: u32) -> Result<Image> {
        Image::new(width, height, self.components())
    }

    /// Atlas text in `color`, using the current background and colorkey
    pub fn text(&mut self, font: &Font, text: &str, x: i32, y: i32, color: Color) {
        let style = TextStyle {
            color,
            ..self.text_style
        };
        let mut canvas = Canvas::new(&mut self.back, self.fill);
        text::draw_text(&mut canvas, font, text, x, y, &style);
    }

    /// Atlas text with the current font and text color
    pub fn write(&mut self, text: &str, x: i32, y: i32) {
        let Some(font) = self.current_font.clone() else {
            log::warn!("write with no active font");
            return;
        };
        let mut canvas = Canvas::new(&mut self.back, self.fill);
        text::draw_text(&mut canvas, &font, text, x, y, &self.text_style);
    }

    /// Built-in 8x8 font text
    pub fn text_simple(&mut self, text: &str, x: i32, y: i32, color: Color) {
        text::draw_text_simple(&mut self.canvas(), text, x, y, color);
    }

    pub fn text_simple_scaled(&mut self, text: &str, x: i32, y: i32, scale: u32, color: Color) {
        text::draw_text_simple_scaled(&mut self.canvas(), text, x, y, scale, color);
    }
}

impl<B: Backend> Drop for RenderContext<B> {
    fn drop(&mut self) {
        self.backend.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_handle_packs_both_halves() {
        let handle = ResizeHandle::new();
        assert_eq!(handle.pending(), None);

        handle.push(800, 600);
        assert_eq!(handle.pending(), Some((800, 600)));
        assert_eq!(handle.take(), Some((800, 600)));
        assert_eq!(handle.take(), None);
    }

    #[test]
    fn resize_handle_later_request_wins() {
        let handle = ResizeHandle::new();
        handle.push(100, 100);
        handle.push(u32::MAX, 7);
        assert_eq!(handle.take(), Some((u32::MAX, 7)));
    }

    #[test]
    fn resize_handle_ignores_zero() {
        let handle = ResizeHandle::new();
        handle.push(0, 10);
        handle.push(10, 0);
        assert_eq!(handle.pending(), None);
    }

    #[test]
    fn resize_handle_shared_across_threads() {
        let handle = ResizeHandle::new();
        let remote = handle.clone();
        std::thread::spawn(move || remote.push(320, 200))
            .join()
            .unwrap();
        assert_eq!(handle.take(), Some((320, 200)));
    }
}
