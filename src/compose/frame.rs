//! # Print Frame Geometry
//!
//! Canonical layout of an instant-film print, in pixels.
//!
//! ```text
//! ├─60─┼──────────── 880 ────────────┼─60─┤
//! ┌────────────────────────────────────────┐ ─┬─
//! │                                        │  60
//! │    ┌────────────────────────────┐      │ ─┼─
//! │    │                            │      │  │
//! │    │     square photo area      │      │ 880
//! │    │                   01.01.24 │      │  │
//! │    └────────────────────────────┘      │ ─┼─
//! │            caption line(s)             │  │
//! │          timestamp (text mode)         │ 260
//! └────────────────────────────────────────┘ ─┴─
//!                  1000 x 1200
//! ```

use image::Rgba;

/// Print width.
pub const PRINT_WIDTH: u32 = 1000;
/// Print height.
pub const PRINT_HEIGHT: u32 = 1200;
/// Frame on the top, left and right sides of the photo.
pub const PADDING: u32 = 60;
/// Side of the square photo area.
pub const IMAGE_SIZE: u32 = PRINT_WIDTH - 2 * PADDING;
/// Bottom edge of the photo area.
pub const IMAGE_BOTTOM: u32 = PADDING + IMAGE_SIZE;
/// Right edge of the photo area.
pub const IMAGE_RIGHT: u32 = PADDING + IMAGE_SIZE;

/// Widest a caption line may measure.
pub const CAPTION_MAX_WIDTH: f32 = (PRINT_WIDTH - 100) as f32;
/// Vertical center of a single caption line.
pub const CAPTION_ANCHOR_Y: f32 = IMAGE_BOTTOM as f32 + 130.0;

/// Vertical center of the text-mode timestamp.
pub const TEXT_TIMESTAMP_Y: f32 = PRINT_HEIGHT as f32 - 40.0;
/// Text-mode timestamp size relative to the caption size.
pub const TEXT_TIMESTAMP_SCALE: f32 = 0.6;

/// Overlay timestamp inset from the photo area's bottom-right corner.
pub const OVERLAY_INSET: f32 = 24.0;
/// Overlay timestamp pixel height.
pub const OVERLAY_PX: f32 = 28.0;
pub const OVERLAY_SHADOW_OFFSET: i64 = 2;

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const CAPTION_COLOR: Rgba<u8> = Rgba([0x33, 0x33, 0x33, 255]);
pub const TEXT_TIMESTAMP_COLOR: Rgba<u8> = Rgba([0x66, 0x66, 0x66, 255]);
/// Warm date-stamp orange.
pub const OVERLAY_COLOR: Rgba<u8> = Rgba([0xFF, 0x8C, 0x2E, 255]);
pub const OVERLAY_SHADOW: Rgba<u8> = Rgba([0, 0, 0, 150]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_area_is_square_and_inside_print() {
        assert_eq!(IMAGE_SIZE, 880);
        assert_eq!(IMAGE_BOTTOM, 940);
        assert!(IMAGE_BOTTOM < PRINT_HEIGHT);
    }

    #[test]
    fn test_text_band_fits_below_photo() {
        assert!(CAPTION_ANCHOR_Y - 50.0 > IMAGE_BOTTOM as f32);
        assert!(TEXT_TIMESTAMP_Y > CAPTION_ANCHOR_Y + 50.0);
        assert!(TEXT_TIMESTAMP_Y < PRINT_HEIGHT as f32);
        assert_eq!(CAPTION_MAX_WIDTH, 900.0);
    }
}
