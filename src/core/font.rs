use super::image::Image;
use crate::error::{FbgError, Result};

/// Top-left corner of a glyph cell inside the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphOrigin {
    pub x: u32,
    pub y: u32,
}

/// Bitmap font cut from a glyph atlas image
///
/// Glyph `i` (character `first_char + i`) sits at `origins[i]`. Origins are
/// laid out by walking the atlas in glyph-width strides, row-major.
#[derive(Debug, Clone)]
pub struct Font {
    glyph_width: u32,
    glyph_height: u32,
    first_char: u8,
    atlas: Image,
    origins: Vec<GlyphOrigin>,
}

impl Font {
    /// Cut `atlas` into `glyph_width x glyph_height` cells starting at `first_char`
    pub fn new(atlas: Image, glyph_width: u32, glyph_height: u32, first_char: u8) -> Result<Self> {
        let invalid = || FbgError::InvalidGlyphSize {
            glyph_width,
            glyph_height,
            atlas_width: atlas.width(),
            atlas_height: atlas.height(),
        };

        if glyph_width == 0 || glyph_height == 0 {
            return Err(invalid());
        }

        let count = (atlas.width() / glyph_width) as usize * (atlas.height() / glyph_height) as usize;
        if count == 0 {
            return Err(invalid());
        }

        let mut origins = Vec::new();
        origins
            .try_reserve_exact(count)
            .map_err(|_| FbgError::Allocation {
                bytes: count * std::mem::size_of::<GlyphOrigin>(),
            })?;

        let atlas_width = atlas.width() as usize;
        for i in 0..count {
            let stride = i * glyph_width as usize;
            origins.push(GlyphOrigin {
                x: (stride % atlas_width) as u32,
                y: ((stride / atlas_width) * glyph_height as usize) as u32,
            });
        }

        log::debug!(
            "created {}x{} font with {} glyphs from '{}'",
            glyph_width,
            glyph_height,
            count,
            first_char as char
        );

        Ok(Self {
            glyph_width,
            glyph_height,
            first_char,
            atlas,
            origins,
        })
    }

    pub fn glyph_width(&self) -> u32 {
        self.glyph_width
    }

    pub fn glyph_height(&self) -> u32 {
        self.glyph_height
    }

    pub fn first_char(&self) -> u8 {
        self.first_char
    }

    pub fn glyph_count(&self) -> usize {
        self.origins.len()
    }

    pub fn atlas(&self) -> &Image {
        &self.atlas
    }

    /// Atlas origin of the glyph for `code`, if the font has one
    pub fn glyph_origin(&self, code: u8) -> Option<GlyphOrigin> {
        let index = code.checked_sub(self.first_char)?;
        self.origins.get(index as usize).copied()
    }

    /// First atlas byte of the glyph pixel at (gx, gy) inside the cell at `origin`
    pub(crate) fn atlas_value(&self, origin: GlyphOrigin, gx: u32, gy: u32) -> u8 {
        let atlas = self.atlas.pixels();
        let (x, y) = (origin.x + gx, origin.y + gy);
        if x >= atlas.width() || y >= atlas.height() {
            return 0;
        }
        atlas.as_bytes()[atlas.offset_trusted(x, y)]
    }
}

/// Compiled-in 8x8 font covering printable ASCII
pub struct BuiltinFont;

impl BuiltinFont {
    pub const GLYPH_WIDTH: u32 = 8;
    pub const GLYPH_HEIGHT: u32 = 8;
    pub const FIRST_CHAR: u8 = 32;
    pub const LAST_CHAR: u8 = 126;

    /// Rows of the glyph for `code`, MSB = leftmost pixel
    pub fn glyph(code: u8) -> Option<&'static [u8; 8]> {
        if !(Self::FIRST_CHAR..=Self::LAST_CHAR).contains(&code) {
            return None;
        }
        BUILTIN_GLYPHS.get((code - Self::FIRST_CHAR) as usize)
    }

    /// Render the table into a 16-column glyph atlas
    ///
    /// Set bits become white, everything else stays zero, so the result
    /// works as an atlas font with colorkey 0 and `FIRST_CHAR` as first char.
    pub fn atlas(components: usize) -> Result<Image> {
        const COLUMNS: u32 = 16;
        let rows = (BUILTIN_GLYPHS.len() as u32).div_ceil(COLUMNS);
        let mut atlas = Image::new(
            COLUMNS * Self::GLYPH_WIDTH,
            rows * Self::GLYPH_HEIGHT,
            components,
        )?;

        let pixels = atlas.pixels_mut();
        for (i, glyph) in BUILTIN_GLYPHS.iter().enumerate() {
            let ox = (i as u32 % COLUMNS) * Self::GLYPH_WIDTH;
            let oy = (i as u32 / COLUMNS) * Self::GLYPH_HEIGHT;
            for (gy, bits) in glyph.iter().enumerate() {
                for gx in 0..Self::GLYPH_WIDTH {
                    if bits & (0x80 >> gx) != 0 {
                        let ofs = pixels.offset_trusted(ox + gx, oy + gy as u32);
                        pixels.as_bytes_mut()[ofs..ofs + 3].fill(255);
                    }
                }
            }
        }
        Ok(atlas)
    }
}

/// One entry per character from ' ' to '~'
static BUILTIN_GLYPHS: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // Space
    [0x18, 0x18, 0x18, 0x18, 0x18, 0x00, 0x18, 0x00], // !
    [0x6C, 0x6C, 0x24, 0x00, 0x00, 0x00, 0x00, 0x00], // "
    [0x6C, 0x6C, 0xFE, 0x6C, 0xFE, 0x6C, 0x6C, 0x00], // #
    [0x18, 0x7E, 0xC0, 0x7C, 0x06, 0xFC, 0x18, 0x00], // $
    [0x00, 0xC6, 0xCC, 0x18, 0x30, 0x66, 0xC6, 0x00], // %
    [0x38, 0x6C, 0x38, 0x76, 0xDC, 0xCC, 0x76, 0x00], // &
    [0x18, 0x18, 0x30, 0x00, 0x00, 0x00, 0x00, 0x00], // '
    [0x0C, 0x18, 0x30, 0x30, 0x30, 0x18, 0x0C, 0x00], // (
    [0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x18, 0x30, 0x00], // )
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // *
    [0x00, 0x18, 0x18, 0x7E, 0x18, 0x18, 0x00, 0x00], // +
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x30], // ,
    [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00], // -
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00], // .
    [0x06, 0x0C, 0x18, 0x30, 0x60, 0xC0, 0x80, 0x00], // /
    [0x7C, 0xCE, 0xDE, 0xF6, 0xE6, 0xC6, 0x7C, 0x00], // 0
    [0x18, 0x38, 0x18, 0x18, 0x18, 0x18, 0x7E, 0x00], // 1
    [0x7C, 0xC6, 0x06, 0x7C, 0xC0, 0xC0, 0xFE, 0x00], // 2
    [0xFC, 0x06, 0x06, 0x3C, 0x06, 0x06, 0xFC, 0x00], // 3
    [0x0C, 0xCC, 0xCC, 0xCC, 0xFE, 0x0C, 0x0C, 0x00], // 4
    [0xFE, 0xC0, 0xFC, 0x06, 0x06, 0xC6, 0x7C, 0x00], // 5
    [0x7C, 0xC0, 0xC0, 0xFC, 0xC6, 0xC6, 0x7C, 0x00], // 6
    [0xFE, 0x06, 0x06, 0x0C, 0x18, 0x18, 0x18, 0x00], // 7
    [0x7C, 0xC6, 0xC6, 0x7C, 0xC6, 0xC6, 0x7C, 0x00], // 8
    [0x7C, 0xC6, 0xC6, 0x7E, 0x06, 0x06, 0x7C, 0x00], // 9
    [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x00], // :
    [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x30], // ;
    [0x0C, 0x18, 0x30, 0x60, 0x30, 0x18, 0x0C, 0x00], // <
    [0x00, 0x00, 0x7E, 0x00, 0x7E, 0x00, 0x00, 0x00], // =
    [0x30, 0x18, 0x0C, 0x06, 0x0C, 0x18, 0x30, 0x00], // >
    [0x3C, 0x66, 0x0C, 0x18, 0x18, 0x00, 0x18, 0x00], // ?
    [0x7C, 0xC6, 0xDE, 0xDE, 0xDE, 0xC0, 0x7E, 0x00], // @
    [0x38, 0x6C, 0xC6, 0xC6, 0xFE, 0xC6, 0xC6, 0x00], // A
    [0xFC, 0xC6, 0xC6, 0xFC, 0xC6, 0xC6, 0xFC, 0x00], // B
    [0x7C, 0xC6, 0xC0, 0xC0, 0xC0, 0xC6, 0x7C, 0x00], // C
    [0xF8, 0xCC, 0xC6, 0xC6, 0xC6, 0xCC, 0xF8, 0x00], // D
    [0xFE, 0xC0, 0xC0, 0xF8, 0xC0, 0xC0, 0xFE, 0x00], // E
    [0xFE, 0xC0, 0xC0, 0xF8, 0xC0, 0xC0, 0xC0, 0x00], // F
    [0x7C, 0xC6, 0xC0, 0xCE, 0xC6, 0xC6, 0x7C, 0x00], // G
    [0xC6, 0xC6, 0xC6, 0xFE, 0xC6, 0xC6, 0xC6, 0x00], // H
    [0x7E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x7E, 0x00], // I
    [0x06, 0x06, 0x06, 0x06, 0xC6, 0xC6, 0x7C, 0x00], // J
    [0xC6, 0xCC, 0xD8, 0xF0, 0xD8, 0xCC, 0xC6, 0x00], // K
    [0xC0, 0xC0, 0xC0, 0xC0, 0xC0, 0xC0, 0xFE, 0x00], // L
    [0xC6, 0xEE, 0xFE, 0xD6, 0xC6, 0xC6, 0xC6, 0x00], // M
    [0xC6, 0xE6, 0xF6, 0xDE, 0xCE, 0xC6, 0xC6, 0x00], // N
    [0x7C, 0xC6, 0xC6, 0xC6, 0xC6, 0xC6, 0x7C, 0x00], // O
    [0xFC, 0xC6, 0xC6, 0xFC, 0xC0, 0xC0, 0xC0, 0x00], // P
    [0x7C, 0xC6, 0xC6, 0xC6, 0xD6, 0xDE, 0x7C, 0x06], // Q
    [0xFC, 0xC6, 0xC6, 0xFC, 0xD8, 0xCC, 0xC6, 0x00], // R
    [0x7C, 0xC6, 0xC0, 0x7C, 0x06, 0xC6, 0x7C, 0x00], // S
    [0x7E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00], // T
    [0xC6, 0xC6, 0xC6, 0xC6, 0xC6, 0xC6, 0x7C, 0x00], // U
    [0xC6, 0xC6, 0xC6, 0xC6, 0x6C, 0x38, 0x10, 0x00], // V
    [0xC6, 0xC6, 0xC6, 0xD6, 0xFE, 0xEE, 0xC6, 0x00], // W
    [0xC6, 0xC6, 0x6C, 0x38, 0x6C, 0xC6, 0xC6, 0x00], // X
    [0x66, 0x66, 0x66, 0x3C, 0x18, 0x18, 0x18, 0x00], // Y
    [0xFE, 0x06, 0x0C, 0x18, 0x30, 0x60, 0xFE, 0x00], // Z
    [0x3C, 0x30, 0x30, 0x30, 0x30, 0x30, 0x3C, 0x00], // [
    [0xC0, 0x60, 0x30, 0x18, 0x0C, 0x06, 0x02, 0x00], // \
    [0x3C, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x3C, 0x00], // ]
    [0x10, 0x38, 0x6C, 0xC6, 0x00, 0x00, 0x00, 0x00], // ^
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFE], // _
    [0x18, 0x18, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x00], // `
    [0x00, 0x00, 0x7C, 0x06, 0x7E, 0xC6, 0x7E, 0x00], // a
    [0xC0, 0xC0, 0xFC, 0xC6, 0xC6, 0xC6, 0xFC, 0x00], // b
    [0x00, 0x00, 0x7C, 0xC6, 0xC0, 0xC6, 0x7C, 0x00], // c
    [0x06, 0x06, 0x7E, 0xC6, 0xC6, 0xC6, 0x7E, 0x00], // d
    [0x00, 0x00, 0x7C, 0xC6, 0xFE, 0xC0, 0x7C, 0x00], // e
    [0x1C, 0x30, 0x30, 0x7C, 0x30, 0x30, 0x30, 0x00], // f
    [0x00, 0x00, 0x7E, 0xC6, 0xC6, 0x7E, 0x06, 0x7C], // g
    [0xC0, 0xC0, 0xFC, 0xC6, 0xC6, 0xC6, 0xC6, 0x00], // h
    [0x18, 0x00, 0x38, 0x18, 0x18, 0x18, 0x3C, 0x00], // i
    [0x18, 0x00, 0x38, 0x18, 0x18, 0x18, 0x18, 0x70], // j
    [0xC0, 0xC0, 0xC6, 0xCC, 0xF8, 0xCC, 0xC6, 0x00], // k
    [0x38, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, 0x00], // l
    [0x00, 0x00, 0xEC, 0xFE, 0xD6, 0xC6, 0xC6, 0x00], // m
    [0x00, 0x00, 0xFC, 0xC6, 0xC6, 0xC6, 0xC6, 0x00], // n
    [0x00, 0x00, 0x7C, 0xC6, 0xC6, 0xC6, 0x7C, 0x00], // o
    [0x00, 0x00, 0xFC, 0xC6, 0xC6, 0xFC, 0xC0, 0xC0], // p
    [0x00, 0x00, 0x7E, 0xC6, 0xC6, 0x7E, 0x06, 0x06], // q
    [0x00, 0x00, 0xDC, 0xE6, 0xC0, 0xC0, 0xC0, 0x00], // r
    [0x00, 0x00, 0x7E, 0xC0, 0x7C, 0x06, 0xFC, 0x00], // s
    [0x30, 0x30, 0x7C, 0x30, 0x30, 0x30, 0x1C, 0x00], // t
    [0x00, 0x00, 0xC6, 0xC6, 0xC6, 0xC6, 0x7E, 0x00], // u
    [0x00, 0x00, 0xC6, 0xC6, 0xC6, 0x6C, 0x38, 0x00], // v
    [0x00, 0x00, 0xC6, 0xC6, 0xD6, 0xFE, 0x6C, 0x00], // w
    [0x00, 0x00, 0xC6, 0x6C, 0x38, 0x6C, 0xC6, 0x00], // x
    [0x00, 0x00, 0xC6, 0xC6, 0xC6, 0x7E, 0x06, 0x7C], // y
    [0x00, 0x00, 0xFE, 0x0C, 0x38, 0x60, 0xFE, 0x00], // z
    [0x0E, 0x18, 0x18, 0x70, 0x18, 0x18, 0x0E, 0x00], // {
    [0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00], // |
    [0x70, 0x18, 0x18, 0x0E, 0x18, 0x18, 0x70, 0x00], // }
    [0x72, 0x9C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ~
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_count_from_grid() {
        let font = Font::new(Image::new(64, 64, 3).unwrap(), 8, 8, 32).unwrap();
        assert_eq!(font.glyph_count(), 64);
    }

    #[test]
    fn origins_follow_row_major_strides() {
        let font = Font::new(Image::new(64, 64, 3).unwrap(), 8, 8, 32).unwrap();
        assert_eq!(font.glyph_origin(32), Some(GlyphOrigin { x: 0, y: 0 }));
        assert_eq!(font.glyph_origin(33), Some(GlyphOrigin { x: 8, y: 0 }));
        // 8 glyphs per row: code 40 is index 8, first cell of the second row
        assert_eq!(font.glyph_origin(40), Some(GlyphOrigin { x: 0, y: 8 }));
        assert_eq!(font.glyph_origin(95), Some(GlyphOrigin { x: 56, y: 56 }));
    }

    #[test]
    fn codes_outside_the_atlas_have_no_glyph() {
        let font = Font::new(Image::new(64, 64, 3).unwrap(), 8, 8, 32).unwrap();
        assert_eq!(font.glyph_origin(31), None);
        assert_eq!(font.glyph_origin(96), None);
    }

    #[test]
    fn rejects_empty_glyph_cells() {
        let atlas = Image::new(16, 16, 3).unwrap();
        assert!(matches!(
            Font::new(atlas.clone(), 0, 8, 32),
            Err(FbgError::InvalidGlyphSize { .. })
        ));
        assert!(matches!(
            Font::new(atlas, 32, 8, 32),
            Err(FbgError::InvalidGlyphSize { .. })
        ));
    }

    #[test]
    fn builtin_covers_printable_ascii() {
        assert!(BuiltinFont::glyph(b' ').is_some());
        assert!(BuiltinFont::glyph(b'~').is_some());
        assert!(BuiltinFont::glyph(31).is_none());
        assert!(BuiltinFont::glyph(127).is_none());
        assert_eq!(BuiltinFont::glyph(b' '), Some(&[0u8; 8]));
    }

    #[test]
    fn builtin_atlas_matches_table() {
        let atlas = BuiltinFont::atlas(3).unwrap();
        assert_eq!((atlas.width(), atlas.height()), (128, 48));

        let font = Font::new(atlas, 8, 8, BuiltinFont::FIRST_CHAR).unwrap();
        assert_eq!(font.glyph_count(), 96);

        let rows = BuiltinFont::glyph(b'A').unwrap();
        let origin = font.glyph_origin(b'A').unwrap();
        for (gy, bits) in rows.iter().enumerate() {
            for gx in 0..8 {
                let lit = bits & (0x80 >> gx) != 0;
                let value = font.atlas_value(origin, gx, gy as u32);
                assert_eq!(value == 255, lit, "pixel ({}, {})", gx, gy);
            }
        }
    }

    #[test]
    fn builtin_bang_is_a_centered_column() {
        let rows = BuiltinFont::glyph(b'!').unwrap();
        assert_eq!(rows[0], 0x18);
        assert_eq!(rows[7], 0x00);
    }
}
