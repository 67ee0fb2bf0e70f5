//! TTF font rendering for user-supplied caption fonts.
//!
//! Renders text to an anti-aliased coverage buffer using ab_glyph. Faces are
//! loaded from disk at startup (see `fonts` in the studio config) and replace
//! the built-in bitmap face for their slot.

use ab_glyph::{Font, FontArc, ScaleFont};
use std::path::Path;

use super::TextMask;
use crate::error::PolaroidError;

/// A TrueType/OpenType face.
#[derive(Clone)]
pub struct TtfFace {
    font: FontArc,
}

impl std::fmt::Debug for TtfFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFace").finish_non_exhaustive()
    }
}

impl TtfFace {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, PolaroidError> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| PolaroidError::Font(format!("Invalid font data: {}", e)))?;
        Ok(Self { font })
    }

    pub fn from_file(path: &Path) -> Result<Self, PolaroidError> {
        let bytes = std::fs::read(path).map_err(|e| {
            PolaroidError::Font(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(bytes)
    }

    /// Horizontal advance of `text`, kerning included.
    pub fn measure(&self, text: &str, pixel_height: f32) -> f32 {
        self.layout(text, pixel_height).1
    }

    fn layout(&self, text: &str, pixel_height: f32) -> (Vec<(ab_glyph::GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(pixel_height);
        let mut glyphs = Vec::new();
        let mut caret_x = 0.0f32;
        let mut prev = None;

        for ch in text.chars() {
            let glyph_id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                caret_x += scaled.kern(prev, glyph_id);
            }
            glyphs.push((glyph_id, caret_x));
            caret_x += scaled.h_advance(glyph_id);
            prev = Some(glyph_id);
        }

        (glyphs, caret_x)
    }

    /// Rasterize a single line. The mask spans ascent to descent.
    pub fn rasterize(&self, text: &str, pixel_height: f32) -> TextMask {
        let scaled = self.font.as_scaled(pixel_height);
        let (glyphs, advance) = self.layout(text, pixel_height);

        let width = advance.ceil().max(1.0) as usize;
        let ascent = scaled.ascent();
        let descent = scaled.descent();
        let height = ((ascent - descent).ceil() as usize).max(1);

        let mut mask = TextMask::blank(width, height);

        for (glyph_id, glyph_x) in glyphs {
            let glyph =
                glyph_id.with_scale_and_position(pixel_height, ab_glyph::point(glyph_x, ascent));

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    let x = px as i32 + bounds.min.x as i32;
                    let y = py as i32 + bounds.min.y as i32;
                    if x >= 0 && y >= 0 {
                        mask.accumulate(x as usize, y as usize, coverage);
                    }
                });
            }
        }

        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_garbage_bytes() {
        assert!(matches!(
            TtfFace::from_bytes(vec![0, 1, 2, 3]),
            Err(PolaroidError::Font(_))
        ));
    }

    #[test]
    fn test_missing_file_is_font_error() {
        let err = TtfFace::from_file(Path::new("/nonexistent/face.ttf")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/face.ttf"));
    }
}
