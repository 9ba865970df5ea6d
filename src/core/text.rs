use super::canvas::Canvas;
use super::font::{BuiltinFont, Font};
use crate::math::Color;

/// Colors used by the atlas text renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Opaque glyph color
    pub color: Color,
    /// Background blended behind glyphs; `background.a` is the blend alpha
    pub background: Color,
    /// Atlas value treated as background (compared against the first channel)
    pub colorkey: u8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            background: Color::BLACK,
            colorkey: 0,
        }
    }
}

/// What the layout cursor asks a renderer to do at one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Glyph { code: u8, x: i32, y: i32 },
    Space { x: i32, y: i32 },
}

/// Walks a string cell by cell
///
/// Both renderers share these rules: a space advances one cell, a newline
/// returns to the start column one cell lower, and a byte the font has no
/// glyph for is skipped without moving the cursor.
pub struct TextLayout<'t, F> {
    bytes: std::slice::Iter<'t, u8>,
    start_x: i32,
    x: i32,
    y: i32,
    cell_width: i32,
    cell_height: i32,
    has_glyph: F,
}

impl<'t, F: Fn(u8) -> bool> TextLayout<'t, F> {
    pub fn new(text: &'t str, x: i32, y: i32, cell_width: u32, cell_height: u32, has_glyph: F) -> Self {
        Self {
            bytes: text.as_bytes().iter(),
            start_x: x,
            x,
            y,
            cell_width: cell_width.min(i32::MAX as u32) as i32,
            cell_height: cell_height.min(i32::MAX as u32) as i32,
            has_glyph,
        }
    }
}

impl<F: Fn(u8) -> bool> Iterator for TextLayout<'_, F> {
    type Item = Placement;

    fn next(&mut self) -> Option<Placement> {
        for &code in self.bytes.by_ref() {
            match code {
                b'\n' => {
                    self.x = self.start_x;
                    self.y = self.y.saturating_add(self.cell_height);
                }
                b' ' => {
                    let placed = Placement::Space { x: self.x, y: self.y };
                    self.x = self.x.saturating_add(self.cell_width);
                    return Some(placed);
                }
                code if (self.has_glyph)(code) => {
                    let placed = Placement::Glyph { code, x: self.x, y: self.y };
                    self.x = self.x.saturating_add(self.cell_width);
                    return Some(placed);
                }
                _ => {}
            }
        }
        None
    }
}

/// Draw `text` with an atlas font
///
/// Spaces paint a background cell. Inside a glyph, atlas pixels matching
/// the colorkey are blended with the background, all others are painted in
/// the opaque text color.
pub fn draw_text(canvas: &mut Canvas<'_>, font: &Font, text: &str, x: i32, y: i32, style: &TextStyle) {
    let (gw, gh) = (font.glyph_width(), font.glyph_height());
    let layout = TextLayout::new(text, x, y, gw, gh, |code| font.glyph_origin(code).is_some());

    for placement in layout {
        match placement {
            Placement::Space { x, y } => canvas.rect_alpha(x, y, gw, gh, style.background),
            Placement::Glyph { code, x, y } => {
                let Some(origin) = font.glyph_origin(code) else {
                    continue;
                };
                for gy in 0..gh {
                    for gx in 0..gw {
                        let (px, py) = (x.saturating_add(gx as i32), y.saturating_add(gy as i32));
                        if font.atlas_value(origin, gx, gy) == style.colorkey {
                            canvas.pixel_alpha(px, py, style.background);
                        } else {
                            canvas.pixel(px, py, style.color);
                        }
                    }
                }
            }
        }
    }
}

/// Draw `text` with the built-in 8x8 font
///
/// Only set bits are drawn; the rest of each cell is left untouched.
pub fn draw_text_simple(canvas: &mut Canvas<'_>, text: &str, x: i32, y: i32, color: Color) {
    draw_text_simple_scaled(canvas, text, x, y, 1, color);
}

/// Built-in font with every glyph pixel drawn as a `scale x scale` block
pub fn draw_text_simple_scaled(canvas: &mut Canvas<'_>, text: &str, x: i32, y: i32, scale: u32, color: Color) {
    if scale == 0 {
        return;
    }

    let cell_w = BuiltinFont::GLYPH_WIDTH.saturating_mul(scale);
    let cell_h = BuiltinFont::GLYPH_HEIGHT.saturating_mul(scale);
    let step = scale.min(i32::MAX as u32) as i32;
    let layout = TextLayout::new(text, x, y, cell_w, cell_h, |code| BuiltinFont::glyph(code).is_some());

    for placement in layout {
        let Placement::Glyph { code, x, y } = placement else {
            continue;
        };
        let Some(rows) = BuiltinFont::glyph(code) else {
            continue;
        };

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let px = x.saturating_add((col as i32).saturating_mul(step));
                let py = y.saturating_add((row as i32).saturating_mul(step));
                if scale == 1 {
                    canvas.pixel(px, py, color);
                } else {
                    canvas.rect(px, py, scale, scale, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(text: &str) -> Vec<Placement> {
        TextLayout::new(text, 10, 20, 8, 8, |c| (b'A'..=b'Z').contains(&c)).collect()
    }

    #[test]
    fn glyphs_advance_one_cell() {
        assert_eq!(
            layout("AB"),
            vec![
                Placement::Glyph { code: b'A', x: 10, y: 20 },
                Placement::Glyph { code: b'B', x: 18, y: 20 },
            ]
        );
    }

    #[test]
    fn space_advances() {
        assert_eq!(
            layout("A B"),
            vec![
                Placement::Glyph { code: b'A', x: 10, y: 20 },
                Placement::Space { x: 18, y: 20 },
                Placement::Glyph { code: b'B', x: 26, y: 20 },
            ]
        );
    }

    #[test]
    fn newline_returns_to_start_column() {
        assert_eq!(
            layout("AB\nC"),
            vec![
                Placement::Glyph { code: b'A', x: 10, y: 20 },
                Placement::Glyph { code: b'B', x: 18, y: 20 },
                Placement::Glyph { code: b'C', x: 10, y: 28 },
            ]
        );
    }

    #[test]
    fn unknown_bytes_do_not_advance() {
        assert_eq!(
            layout("a\tB"),
            vec![Placement::Glyph { code: b'B', x: 10, y: 20 }]
        );
    }
}
