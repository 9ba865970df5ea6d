use super::image::Image;
use super::pixel_buffer::PixelBuffer;
use crate::error::{FbgError, Result};
use crate::math::Color;

/// Source or destination rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanning `[x1, x2) x [y1, y2)`; empty if the corners are reversed
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: (x2 as i64 - x1 as i64).max(0) as u32,
            height: (y2 as i64 - y1 as i64).max(0) as u32,
        }
    }
}

/// Normalized blend of one channel: `a = 255` yields `src`, `a = 0` yields `dst`
#[inline]
pub fn blend(src: u8, dst: u8, a: u8) -> u8 {
    let a = a as u32;
    ((a * src as u32 + (255 - a) * dst as u32 + 127) / 255) as u8
}

/// Intersection of `[x, x+w) x [y, y+h)` with a `width x height` area,
/// as `(x0, y0, x1, y1)` with exclusive ends
fn clip(x: i32, y: i32, w: u32, h: u32, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = (x as i64).max(0);
    let y0 = (y as i64).max(0);
    let x1 = (x as i64 + w as i64).min(width as i64);
    let y1 = (y as i64 + h as i64).min(height as i64);

    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Drawing primitives over one target buffer
///
/// Coordinates may fall outside the target: every primitive clips to the
/// buffer and silently drops what lies outside. Only checked accessors
/// (`get_pixel`, `plot`) report out-of-range access as an error.
pub struct Canvas<'a> {
    target: &'a mut PixelBuffer,
    fill: Color,
}

impl<'a> Canvas<'a> {
    /// Create a canvas drawing into `target`, using `fill` for the fast fill primitives
    pub fn new(target: &'a mut PixelBuffer, fill: Color) -> Self {
        Self { target, fill }
    }

    pub fn target(&self) -> &PixelBuffer {
        &*self.target
    }

    pub fn target_mut(&mut self) -> &mut PixelBuffer {
        &mut *self.target
    }

    pub fn fill_color(&self) -> Color {
        self.fill
    }

    pub fn set_fill_color(&mut self, fill: Color) {
        self.fill = fill;
    }

    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    #[inline]
    fn put_rgb(&mut self, ofs: usize, color: Color) {
        let px = &mut self.target.as_bytes_mut()[ofs..ofs + 3];
        px[0] = color.r;
        px[1] = color.g;
        px[2] = color.b;
    }

    #[inline]
    fn blend_rgb(&mut self, ofs: usize, color: Color) {
        let px = &mut self.target.as_bytes_mut()[ofs..ofs + 3];
        px[0] = blend(color.r, px[0], color.a);
        px[1] = blend(color.g, px[1], color.a);
        px[2] = blend(color.b, px[2], color.a);
    }

    /// Opaque pixel; the pad byte of 4-component targets is left alone
    pub fn pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.target.contains(x, y) {
            let ofs = self.target.offset_trusted(x as u32, y as u32);
            self.put_rgb(ofs, color);
        }
    }

    /// Pixel blended with the destination using `color.a`
    pub fn pixel_alpha(&mut self, x: i32, y: i32, color: Color) {
        if self.target.contains(x, y) {
            let ofs = self.target.offset_trusted(x as u32, y as u32);
            self.blend_rgb(ofs, color);
        }
    }

    /// Pixel in the fill color, all components copied
    pub fn fill_pixel(&mut self, x: i32, y: i32) {
        if self.target.contains(x, y) {
            let comps = self.target.components();
            let ofs = self.target.offset_trusted(x as u32, y as u32);
            let bytes = self.fill.to_bytes();
            self.target.as_bytes_mut()[ofs..ofs + comps].copy_from_slice(&bytes[..comps]);
        }
    }

    /// Raw byte write at a linear index
    pub fn plot(&mut self, index: usize, value: u8) -> Result<()> {
        self.target.plot(index, value)
    }

    /// Read pixel (x, y); `a` holds the pad byte, or 0 for 3-component targets
    pub fn get_pixel(&self, x: i32, y: i32) -> Result<Color> {
        let px = self.target.pixel_bytes(x, y)?;
        Ok(Color::rgba(px[0], px[1], px[2], px.get(3).copied().unwrap_or(0)))
    }

    /// Horizontal run of `w` pixels starting at (x, y)
    pub fn hline(&mut self, x: i32, y: i32, w: u32, color: Color) {
        if let Some((x0, y0, x1, _)) = clip(x, y, w, 1, self.width(), self.height()) {
            let comps = self.target.components();
            let mut ofs = self.target.offset_trusted(x0, y0);
            for _ in x0..x1 {
                self.put_rgb(ofs, color);
                ofs += comps;
            }
        }
    }

    /// Vertical run of `h` pixels starting at (x, y)
    pub fn vline(&mut self, x: i32, y: i32, h: u32, color: Color) {
        if let Some((x0, y0, _, y1)) = clip(x, y, 1, h, self.width(), self.height()) {
            let line = self.target.line_length();
            let mut ofs = self.target.offset_trusted(x0, y0);
            for _ in y0..y1 {
                self.put_rgb(ofs, color);
                ofs += line;
            }
        }
    }

    /// Line between two points, endpoints inclusive (Bresenham)
    ///
    /// Endpoints are ordered along the major axis before stepping, so
    /// swapping them paints the same pixel set.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        let (mut x1, mut y1, mut x2, mut y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);

        let x_major = (x2 - x1).abs() >= (y2 - y1).abs();
        if (x_major && x1 > x2) || (!x_major && y1 > y2) {
            std::mem::swap(&mut x1, &mut x2);
            std::mem::swap(&mut y1, &mut y2);
        }

        let (dx, dy) = (x2 - x1, y2 - y1);
        let (dxabs, dyabs) = (dx.abs(), dy.abs());
        let (sdx, sdy) = (dx.signum(), dy.signum());
        let (mut px, mut py) = (x1, y1);

        self.plot_wide(px, py, color);

        if x_major {
            let mut err = dxabs >> 1;
            for _ in 0..dxabs {
                err += dyabs;
                if err >= dxabs {
                    err -= dxabs;
                    py += sdy;
                }
                px += sdx;
                self.plot_wide(px, py, color);
            }
        } else {
            let mut err = dyabs >> 1;
            for _ in 0..dyabs {
                err += dxabs;
                if err >= dyabs {
                    err -= dyabs;
                    px += sdx;
                }
                py += sdy;
                self.plot_wide(px, py, color);
            }
        }
    }

    #[inline]
    fn plot_wide(&mut self, x: i64, y: i64, color: Color) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.pixel(x, y, color);
        }
    }

    /// Outline through `vertices`, closed back to the first vertex
    pub fn polygon(&mut self, vertices: &[(i32, i32)], color: Color) {
        let Some(&(fx, fy)) = vertices.first() else {
            return;
        };

        for pair in vertices.windows(2) {
            let ((ax, ay), (bx, by)) = (pair[0], pair[1]);
            self.line(ax, ay, bx, by, color);
        }

        if let Some(&(lx, ly)) = vertices.last() {
            self.line(fx, fy, lx, ly, color);
        }
    }

    /// Filled opaque rectangle
    pub fn rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        if let Some((x0, y0, x1, y1)) = clip(x, y, w, h, self.width(), self.height()) {
            let comps = self.target.components();
            let stride = self.target.line_length() - (x1 - x0) as usize * comps;
            let mut ofs = self.target.offset_trusted(x0, y0);

            for _ in y0..y1 {
                for _ in x0..x1 {
                    self.put_rgb(ofs, color);
                    ofs += comps;
                }
                ofs += stride;
            }
        }
    }

    /// Filled rectangle blended with `color.a`
    pub fn rect_alpha(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        if let Some((x0, y0, x1, y1)) = clip(x, y, w, h, self.width(), self.height()) {
            let comps = self.target.components();
            let stride = self.target.line_length() - (x1 - x0) as usize * comps;
            let mut ofs = self.target.offset_trusted(x0, y0);

            for _ in y0..y1 {
                for _ in x0..x1 {
                    self.blend_rgb(ofs, color);
                    ofs += comps;
                }
                ofs += stride;
            }
        }
    }

    /// Filled rectangle in the fill color
    ///
    /// The first row is written pixel by pixel; every other row is a copy
    /// of it.
    pub fn filled_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        let Some((x0, y0, x1, y1)) = clip(x, y, w, h, self.width(), self.height()) else {
            return;
        };

        let comps = self.target.components();
        let line = self.target.line_length();
        let row_len = (x1 - x0) as usize * comps;
        let first = self.target.offset_trusted(x0, y0);
        let bytes = self.fill.to_bytes();

        let data = self.target.as_bytes_mut();
        for px in data[first..first + row_len].chunks_exact_mut(comps) {
            px.copy_from_slice(&bytes[..comps]);
        }

        let mut ofs = first;
        for _ in y0 + 1..y1 {
            ofs += line;
            data.copy_within(first..first + row_len, ofs);
        }
    }

    /// Set every pixel's color channels
    pub fn background(&mut self, color: Color) {
        let comps = self.target.components();
        for px in self.target.as_bytes_mut().chunks_exact_mut(comps) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
        }
    }

    /// Set every byte (pad bytes included) to `brightness`
    pub fn clear(&mut self, brightness: u8) {
        self.target.fill_bytes(brightness);
    }

    /// Darken every color channel by `amount`, saturating at 0
    pub fn fade_down(&mut self, amount: u8) {
        let comps = self.target.components();
        for px in self.target.as_bytes_mut().chunks_exact_mut(comps) {
            for c in &mut px[..3] {
                *c = c.saturating_sub(amount);
            }
        }
    }

    /// Brighten every color channel by `amount`, saturating at 255
    pub fn fade_up(&mut self, amount: u8) {
        let comps = self.target.components();
        for px in self.target.as_bytes_mut().chunks_exact_mut(comps) {
            for c in &mut px[..3] {
                *c = c.saturating_add(amount);
            }
        }
    }

    fn check_image(&self, img: &Image) -> Result<()> {
        if img.components() != self.target.components() {
            return Err(FbgError::ComponentMismatch {
                expected: self.target.components(),
                found: img.components(),
            });
        }
        Ok(())
    }

    /// Copy an image with its top-left corner at (x, y)
    pub fn image(&mut self, img: &Image, x: i32, y: i32) -> Result<()> {
        self.image_clip(img, x, y, Rect::new(0, 0, img.width(), img.height()))
    }

    /// Copy the `src` region of an image to (x, y)
    ///
    /// The region is clamped to the image and the copied width never
    /// exceeds what remains of the destination row.
    pub fn image_clip(&mut self, img: &Image, x: i32, y: i32, src: Rect) -> Result<()> {
        self.check_image(img)?;

        let Some((sx0, sy0, sx1, sy1)) =
            clip(src.x, src.y, src.width, src.height, img.width(), img.height())
        else {
            return Ok(());
        };

        // destination position of the clamped source origin
        let dx = x as i64 + (sx0 as i64 - src.x as i64);
        let dy = y as i64 + (sy0 as i64 - src.y as i64);
        let (Ok(dx), Ok(dy)) = (i32::try_from(dx), i32::try_from(dy)) else {
            return Ok(());
        };

        let Some((x0, y0, x1, y1)) = clip(dx, dy, sx1 - sx0, sy1 - sy0, self.width(), self.height())
        else {
            return Ok(());
        };

        let comps = self.target.components();
        let row_len = (x1 - x0) as usize * comps;
        let src_x = sx0 + (x0 as i64 - dx as i64) as u32;
        let src_y = sy0 + (y0 as i64 - dy as i64) as u32;
        let source = img.pixels();

        for row in 0..(y1 - y0) {
            let s = source.offset_trusted(src_x, src_y + row);
            let d = self.target.offset_trusted(x0, y0 + row);
            self.target.as_bytes_mut()[d..d + row_len]
                .copy_from_slice(&source.as_bytes()[s..s + row_len]);
        }
        Ok(())
    }

    /// Copy an image, skipping pixels whose RGB equals `key`
    pub fn image_colorkey(&mut self, img: &Image, x: i32, y: i32, key: Color) -> Result<()> {
        self.check_image(img)?;

        let source = img.pixels();
        for iy in 0..img.height() {
            for ix in 0..img.width() {
                let s = source.offset_trusted(ix, iy);
                let px = &source.as_bytes()[s..s + 3];
                if px[0] == key.r && px[1] == key.g && px[2] == key.b {
                    continue;
                }
                let (tx, ty) = (x as i64 + ix as i64, y as i64 + iy as i64);
                if let (Ok(tx), Ok(ty)) = (i32::try_from(tx), i32::try_from(ty)) {
                    self.pixel(tx, ty, Color::rgb(px[0], px[1], px[2]));
                }
            }
        }
        Ok(())
    }

    /// Nearest-neighbor scaled copy of the `src` region of an image
    ///
    /// The region is scaled by (`sx`, `sy`); destination pixel (i, j) of the
    /// scaled region samples source pixel (floor(j / sx), floor(i / sy)).
    /// Non-positive or non-finite scales draw nothing.
    pub fn image_ex(&mut self, img: &Image, x: i32, y: i32, sx: f32, sy: f32, src: Rect) -> Result<()> {
        self.check_image(img)?;

        if !(sx.is_finite() && sy.is_finite() && sx > 0.0 && sy > 0.0) {
            return Ok(());
        }

        let cx2 = (src.x as f32 * sx) as i64;
        let cy2 = (src.y as f32 * sy) as i64;
        let w2 = ((src.width as f32 + src.x as f32) * sx) as i64;
        let h2 = ((src.height as f32 + src.y as f32) * sy) as i64;

        // clamp the scaled span to the destination; huge finite scales
        // saturate the span ends at i64::MAX
        let w2 = w2.min(cx2.saturating_add(self.width() as i64 - x as i64));
        let h2 = h2.min(cy2.saturating_add(self.height() as i64 - y as i64));
        // skip the part left of / above the destination
        let j0 = cx2.saturating_add((-(x as i64)).max(0));
        let i0 = cy2.saturating_add((-(y as i64)).max(0));

        let (x_inv, y_inv) = (1.0 / sx, 1.0 / sy);
        let comps = self.target.components();
        let source = img.pixels();

        for i in i0..h2 {
            let ty = y as i64 + (i - cy2);
            let py = (y_inv * i as f32).floor() as i64;
            if ty < 0 || py < 0 || py >= img.height() as i64 {
                continue;
            }

            for j in j0..w2 {
                let tx = x as i64 + (j - cx2);
                let px = (x_inv * j as f32).floor() as i64;
                if tx < 0 || px < 0 || px >= img.width() as i64 {
                    continue;
                }

                let s = source.offset_trusted(px as u32, py as u32);
                let d = self.target.offset_trusted(tx as u32, ty as u32);
                self.target.as_bytes_mut()[d..d + comps]
                    .copy_from_slice(&source.as_bytes()[s..s + comps]);
            }
        }
        Ok(())
    }

    /// Nearest-neighbor scaled copy of the whole image
    pub fn image_scale(&mut self, img: &Image, x: i32, y: i32, sx: f32, sy: f32) -> Result<()> {
        self.image_ex(img, x, y, sx, sy, Rect::new(0, 0, img.width(), img.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(w: u32, h: u32, comps: usize) -> PixelBuffer {
        PixelBuffer::allocate(w, h, comps).unwrap()
    }

    #[test]
    fn canvas_set_pixel() {
        let mut buf = buffer(10, 10, 3);
        let mut canvas = Canvas::new(&mut buf, Color::BLACK);
        canvas.pixel(5, 5, Color::rgb(100, 150, 200));

        let idx = (5 * 10 + 5) * 3;
        assert_eq!(&buf.as_bytes()[idx..idx + 3], &[100, 150, 200]);
    }

    #[test]
    fn canvas_pixel_keeps_pad_byte() {
        let mut buf = buffer(4, 4, 4);
        buf.fill_bytes(42);
        Canvas::new(&mut buf, Color::BLACK).pixel(1, 1, Color::rgb(1, 2, 3));

        let idx = (4 + 1) * 4;
        assert_eq!(&buf.as_bytes()[idx..idx + 4], &[1, 2, 3, 42]);
    }

    #[test]
    fn canvas_bounds_checking() {
        let mut buf = buffer(10, 10, 3);
        let mut canvas = Canvas::new(&mut buf, Color::BLACK);
        canvas.pixel(100, 100, Color::WHITE);
        canvas.pixel(-1, 3, Color::WHITE);
        canvas.rect(-5, -5, 3, 3, Color::WHITE);

        assert!(buf.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn blend_endpoints_are_exact() {
        for src in [0u8, 1, 127, 128, 254, 255] {
            for dst in [0u8, 3, 200, 255] {
                assert_eq!(blend(src, dst, 255), src);
                assert_eq!(blend(src, dst, 0), dst);
            }
        }
    }

    #[test]
    fn blend_half_rounds() {
        assert_eq!(blend(255, 0, 128), 128);
        assert_eq!(blend(0, 255, 128), 127);
    }

    #[test]
    fn canvas_hline_clips() {
        let mut buf = buffer(10, 10, 3);
        Canvas::new(&mut buf, Color::BLACK).hline(-2, 4, 5, Color::rgb(9, 9, 9));

        for x in 0..10 {
            let idx = (4 * 10 + x) * 3;
            let expected = if x < 3 { 9 } else { 0 };
            assert_eq!(buf.as_bytes()[idx], expected, "x={}", x);
        }
    }

    #[test]
    fn canvas_line_endpoints() {
        let mut buf = buffer(50, 50, 3);
        let mut canvas = Canvas::new(&mut buf, Color::BLACK);
        let c = Color::rgb(128, 128, 128);
        canvas.line(10, 10, 20, 20, c);

        assert_eq!(canvas.get_pixel(10, 10).unwrap(), c);
        assert_eq!(canvas.get_pixel(20, 20).unwrap(), c);
        assert_eq!(canvas.get_pixel(15, 15).unwrap(), c);
    }

    #[test]
    fn canvas_single_point_line() {
        let mut buf = buffer(5, 5, 3);
        let mut canvas = Canvas::new(&mut buf, Color::BLACK);
        canvas.line(2, 2, 2, 2, Color::WHITE);

        let lit = buf.as_bytes().chunks(3).filter(|p| p[0] == 255).count();
        assert_eq!(lit, 1);
    }

    #[test]
    fn polygon_closes_shape() {
        let mut buf = buffer(20, 20, 3);
        let mut canvas = Canvas::new(&mut buf, Color::BLACK);
        let c = Color::rgb(0, 255, 0);
        canvas.polygon(&[(2, 2), (10, 2), (10, 10)], c);

        // closing edge runs from the first vertex to the last
        assert_eq!(canvas.get_pixel(6, 6).unwrap(), c);
        assert_eq!(canvas.get_pixel(6, 2).unwrap(), c);
        assert_eq!(canvas.get_pixel(10, 6).unwrap(), c);
    }

    #[test]
    fn fade_saturates() {
        let mut buf = buffer(2, 1, 3);
        let mut canvas = Canvas::new(&mut buf, Color::BLACK);
        canvas.background(Color::rgb(10, 250, 128));
        canvas.fade_up(10);
        assert_eq!(canvas.get_pixel(0, 0).unwrap(), Color::rgb(20, 255, 138));
        canvas.fade_down(30);
        assert_eq!(canvas.get_pixel(1, 0).unwrap(), Color::rgb(0, 225, 108));
    }

    #[test]
    fn image_component_mismatch() {
        let mut buf = buffer(4, 4, 3);
        let img = Image::new(2, 2, 4).unwrap();
        let result = Canvas::new(&mut buf, Color::BLACK).image(&img, 0, 0);
        assert!(matches!(
            result,
            Err(FbgError::ComponentMismatch { expected: 3, found: 4 })
        ));
    }

    #[test]
    fn image_ex_huge_scale_is_clamped() {
        let mut img = Image::new(2, 1, 3).unwrap();
        img.data_mut().copy_from_slice(&[7, 7, 7, 9, 9, 9]);
        let mut buf = buffer(8, 8, 3);
        let mut canvas = Canvas::new(&mut buf, Color::BLACK);

        // region start scaled past i64::MAX: nothing to draw
        canvas.image_ex(&img, 0, 0, 1e30, 1.0, Rect::new(1, 0, 1, 1)).unwrap();
        assert!(canvas.target.as_bytes().iter().all(|&b| b == 0));

        // region at the origin: the first column stretches across the row
        canvas.image_ex(&img, 0, 0, 1e30, 1.0, Rect::new(0, 0, 1, 1)).unwrap();
        for x in 0..8 {
            assert_eq!(canvas.get_pixel(x, 0).unwrap(), Color::gray(7));
        }
        assert_eq!(canvas.get_pixel(0, 1).unwrap(), Color::BLACK);
    }

    #[test]
    fn image_ex_far_left_destination() {
        let mut img = Image::new(1, 1, 3).unwrap();
        img.data_mut().copy_from_slice(&[5, 5, 5]);
        let mut buf = buffer(4, 4, 3);
        let mut canvas = Canvas::new(&mut buf, Color::BLACK);

        canvas.image_ex(&img, i32::MIN, 0, 1.0, 1.0, Rect::new(0, 0, 1, 1)).unwrap();
        canvas.image_ex(&img, -3, -3, 4.0, 4.0, Rect::new(0, 0, 1, 1)).unwrap();

        assert_eq!(canvas.get_pixel(0, 0).unwrap(), Color::gray(5));
        assert_eq!(canvas.get_pixel(1, 0).unwrap(), Color::BLACK);
        assert_eq!(canvas.get_pixel(0, 1).unwrap(), Color::BLACK);
    }

    #[test]
    fn rect_from_corners() {
        assert_eq!(Rect::from_corners(1, 2, 5, 4), Rect::new(1, 2, 4, 2));
        assert_eq!(Rect::from_corners(5, 5, 1, 1).width, 0);
    }
}
