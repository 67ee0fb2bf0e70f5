//! Built-in bitmap faces.
//!
//! Uses the Spleen bitmap font family so prints render identically on every
//! machine without system fonts. Glyphs are scaled with nearest neighbor to
//! the requested pixel height.
//!
//! | Face | Spleen cell |
//! |------|-------------|
//! | Typewriter | 12x24 |
//! | Handwritten | 6x12 |
//! | Clean | 8x16 |
//! | Mono (timestamps) | 12x24 |

use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

use super::TextMask;

/// A monospace PSF2 face with a fixed cell size.
#[derive(Debug, Clone, Copy)]
pub struct BitmapFace {
    data: &'static [u8],
    cell_width: usize,
    cell_height: usize,
}

impl BitmapFace {
    pub fn spleen_6x12() -> Self {
        Self {
            data: &FONT_6X12[..],
            cell_width: 6,
            cell_height: 12,
        }
    }

    pub fn spleen_8x16() -> Self {
        Self {
            data: &FONT_8X16[..],
            cell_width: 8,
            cell_height: 16,
        }
    }

    pub fn spleen_12x24() -> Self {
        Self {
            data: &FONT_12X24[..],
            cell_width: 12,
            cell_height: 24,
        }
    }

    fn scale(&self, pixel_height: f32) -> f32 {
        pixel_height / self.cell_height as f32
    }

    /// Advance of a single character at `pixel_height`.
    pub fn advance(&self, pixel_height: f32) -> f32 {
        self.cell_width as f32 * self.scale(pixel_height)
    }

    pub fn measure(&self, text: &str, pixel_height: f32) -> f32 {
        text.chars().count() as f32 * self.advance(pixel_height)
    }

    /// Rasterize a single line of text.
    pub fn rasterize(&self, text: &str, pixel_height: f32) -> TextMask {
        let scale = self.scale(pixel_height);
        let advance = self.advance(pixel_height);
        let count = text.chars().count();

        let width = (count as f32 * advance).ceil().max(1.0) as usize;
        let height = pixel_height.ceil().max(1.0) as usize;
        let mut mask = TextMask::blank(width, height);

        let Ok(mut psf) = PSF2Font::new(self.data) else {
            tracing::warn!("bitmap font data failed to parse");
            return mask;
        };

        let glyph_w = advance.ceil() as usize;
        for (i, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let mut glyph = vec![false; self.cell_width * self.cell_height];
            let mut buf = [0u8; 4];
            match psf.glyph_for_utf8(ch.encode_utf8(&mut buf).as_bytes()) {
                Some(rows) => {
                    for (row_y, row) in rows.enumerate() {
                        for (col_x, on) in row.enumerate() {
                            if row_y < self.cell_height && col_x < self.cell_width {
                                glyph[row_y * self.cell_width + col_x] = on;
                            }
                        }
                    }
                }
                None => box_outline(&mut glyph, self.cell_width, self.cell_height),
            }
            let origin_x = (i as f32 * advance).floor() as usize;

            for dy in 0..height {
                let sy = ((dy as f32 / scale) as usize).min(self.cell_height - 1);
                for dx in 0..glyph_w {
                    let sx = ((dx as f32 / scale) as usize).min(self.cell_width - 1);
                    if glyph[sy * self.cell_width + sx] {
                        mask.set(origin_x + dx, dy, 1.0);
                    }
                }
            }
        }

        mask
    }
}

/// Outline drawn for characters the face lacks.
fn box_outline(glyph: &mut [bool], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = true;
        glyph[(height - 1) * width + x] = true;
    }
    for y in 0..height {
        glyph[y * width] = true;
        glyph[y * width + width - 1] = true;
    }
}
