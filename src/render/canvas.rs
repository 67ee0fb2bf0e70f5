//! Drawing text masks onto the RGBA print canvas.

use image::{Rgba, RgbaImage};

use crate::text::{Face, TextMask};

/// Horizontal anchor for [`draw_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `x` is the horizontal center of the text.
    Center,
    /// `x` is the right edge of the text.
    Right,
}

/// Alpha-blend `color` through `mask` with the mask's top-left at `(x, y)`.
///
/// Pixels falling outside the canvas are clipped.
pub fn blend_mask(canvas: &mut RgbaImage, mask: &TextMask, x: i64, y: i64, color: Rgba<u8>) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    let alpha = color.0[3] as f32 / 255.0;

    for my in 0..mask.height {
        let py = y + my as i64;
        if py < 0 || py >= ch {
            continue;
        }
        for mx in 0..mask.width {
            let px = x + mx as i64;
            if px < 0 || px >= cw {
                continue;
            }
            let a = mask.get(mx, my) * alpha;
            if a <= 0.0 {
                continue;
            }
            let dst = canvas.get_pixel_mut(px as u32, py as u32);
            for c in 0..3 {
                let v = dst.0[c] as f32 * (1.0 - a) + color.0[c] as f32 * a;
                dst.0[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Draw one line of text vertically centered on `center_y`.
///
/// Returns the mask's top-left so callers can reuse the placement.
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    canvas: &mut RgbaImage,
    face: &Face,
    text: &str,
    pixel_height: f32,
    x: f32,
    center_y: f32,
    anchor: Anchor,
    color: Rgba<u8>,
) -> (i64, i64) {
    let mask = face.rasterize(text, pixel_height);
    let left = match anchor {
        Anchor::Center => x - mask.width as f32 / 2.0,
        Anchor::Right => x - mask.width as f32,
    };
    let top = center_y - mask.height as f32 / 2.0;
    let origin = (left.round() as i64, top.round() as i64);
    blend_mask(canvas, &mask, origin.0, origin.1, color);
    origin
}

/// Like [`draw_text`] but with a drop shadow offset by `shadow_offset` pixels.
#[allow(clippy::too_many_arguments)]
pub fn draw_text_with_shadow(
    canvas: &mut RgbaImage,
    face: &Face,
    text: &str,
    pixel_height: f32,
    x: f32,
    center_y: f32,
    anchor: Anchor,
    color: Rgba<u8>,
    shadow: Rgba<u8>,
    shadow_offset: i64,
) {
    let mask = face.rasterize(text, pixel_height);
    let left = match anchor {
        Anchor::Center => x - mask.width as f32 / 2.0,
        Anchor::Right => x - mask.width as f32,
    };
    let top = center_y - mask.height as f32 / 2.0;
    let (ox, oy) = (left.round() as i64, top.round() as i64);

    blend_mask(canvas, &mask, ox + shadow_offset, oy + shadow_offset, shadow);
    blend_mask(canvas, &mask, ox, oy, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::BitmapFace;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_full_coverage_replaces_pixel() {
        let mut canvas = RgbaImage::from_pixel(4, 4, WHITE);
        let mut mask = TextMask::blank(1, 1);
        mask.set(0, 0, 1.0);
        blend_mask(&mut canvas, &mask, 2, 2, BLACK);
        assert_eq!(*canvas.get_pixel(2, 2), BLACK);
        assert_eq!(*canvas.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn test_partial_coverage_blends() {
        let mut canvas = RgbaImage::from_pixel(1, 1, WHITE);
        let mut mask = TextMask::blank(1, 1);
        mask.set(0, 0, 0.5);
        blend_mask(&mut canvas, &mask, 0, 0, BLACK);
        assert_eq!(canvas.get_pixel(0, 0).0[0], 128);
    }

    #[test]
    fn test_clips_outside_canvas() {
        let mut canvas = RgbaImage::from_pixel(2, 2, WHITE);
        let mut mask = TextMask::blank(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                mask.set(x, y, 1.0);
            }
        }
        blend_mask(&mut canvas, &mask, -2, -2, BLACK);
        assert_eq!(*canvas.get_pixel(0, 0), BLACK);
        assert_eq!(*canvas.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn test_right_anchor_ends_at_x() {
        let face = Face::Bitmap(BitmapFace::spleen_12x24());
        let mut canvas = RgbaImage::from_pixel(200, 50, WHITE);
        let (left, _) = draw_text(&mut canvas, &face, "abc", 24.0, 150.0, 25.0, Anchor::Right, BLACK);
        assert_eq!(left, 150 - 36);
        for y in 0..50 {
            for x in 150..200 {
                assert_eq!(*canvas.get_pixel(x, y), WHITE);
            }
        }
    }
}
