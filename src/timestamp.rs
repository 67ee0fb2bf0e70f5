//! # Timestamp Renderer
//!
//! Draws the capture time onto a print in one of three modes.
//!
//! | Mode | Format | Where | Face |
//! |------|--------|-------|------|
//! | `Off` | - | nothing drawn | - |
//! | `Overlay` | `01.01.2024 12:00:00` (24h) | inside the photo, bottom-right, drop shadow | mono |
//! | `Text` | `01/01/2024 12:00 PM` (12h) | centered in the bottom band | caption font, reduced |
//!
//! The two formats stay distinct: dotted date with 24h time for the overlay,
//! slashed date with 12h time for the text line.
//!
//! Output depends only on the mode, the capture time and the configured UTC
//! offset, never on the wall clock at render time.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use image::RgbaImage;

use crate::compose::frame;
use crate::render::canvas::{self, Anchor};
use crate::style::{FontChoice, TimestampMode};
use crate::text::{FontSet, caption_px};

/// Formats and places capture timestamps.
#[derive(Debug, Clone, Copy)]
pub struct TimestampRenderer {
    offset: FixedOffset,
}

impl Default for TimestampRenderer {
    fn default() -> Self {
        Self::utc()
    }
}

impl TimestampRenderer {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Renderer formatting times at a fixed offset from UTC.
    ///
    /// Offsets outside ±24h fall back to UTC.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        match FixedOffset::east_opt(minutes.saturating_mul(60)) {
            Some(offset) => Self { offset },
            None => {
                tracing::warn!(minutes, "utc offset out of range, using UTC");
                Self::utc()
            }
        }
    }

    /// Day-first date with dots, 24-hour time.
    pub fn format_overlay(&self, captured_at: DateTime<Utc>) -> String {
        captured_at
            .with_timezone(&self.offset)
            .format("%d.%m.%Y %H:%M:%S")
            .to_string()
    }

    /// Day-first date with slashes, 12-hour time.
    pub fn format_text(&self, captured_at: DateTime<Utc>) -> String {
        captured_at
            .with_timezone(&self.offset)
            .format("%d/%m/%Y %-I:%M %p")
            .to_string()
    }

    /// Draw the timestamp for `mode` onto a full-size print canvas.
    pub fn render(
        &self,
        mode: TimestampMode,
        captured_at: DateTime<Utc>,
        font: FontChoice,
        fonts: &FontSet,
        canvas: &mut RgbaImage,
    ) {
        match mode {
            TimestampMode::Off => {}
            TimestampMode::Overlay => {
                let label = self.format_overlay(captured_at);
                let right = frame::IMAGE_RIGHT as f32 - frame::OVERLAY_INSET;
                let center_y =
                    frame::IMAGE_BOTTOM as f32 - frame::OVERLAY_INSET - frame::OVERLAY_PX / 2.0;
                canvas::draw_text_with_shadow(
                    canvas,
                    fonts.mono(),
                    &label,
                    frame::OVERLAY_PX,
                    right,
                    center_y,
                    Anchor::Right,
                    frame::OVERLAY_COLOR,
                    frame::OVERLAY_SHADOW,
                    frame::OVERLAY_SHADOW_OFFSET,
                );
            }
            TimestampMode::Text => {
                let label = self.format_text(captured_at);
                let px = (caption_px(font) * frame::TEXT_TIMESTAMP_SCALE).round();
                canvas::draw_text(
                    canvas,
                    fonts.face(font),
                    &label,
                    px,
                    frame::PRINT_WIDTH as f32 / 2.0,
                    frame::TEXT_TIMESTAMP_Y,
                    Anchor::Center,
                    frame::TEXT_TIMESTAMP_COLOR,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_year_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn blank() -> RgbaImage {
        RgbaImage::from_pixel(frame::PRINT_WIDTH, frame::PRINT_HEIGHT, frame::BACKGROUND)
    }

    #[test]
    fn test_overlay_format() {
        let r = TimestampRenderer::utc();
        assert_eq!(r.format_overlay(new_year_noon()), "01.01.2024 12:00:00");
    }

    #[test]
    fn test_text_format_is_12_hour() {
        let r = TimestampRenderer::utc();
        assert_eq!(r.format_text(new_year_noon()), "01/01/2024 12:00 PM");
        let evening = Utc.with_ymd_and_hms(2024, 3, 9, 21, 5, 0).unwrap();
        assert_eq!(r.format_text(evening), "09/03/2024 9:05 PM");
    }

    #[test]
    fn test_offset_applied() {
        let r = TimestampRenderer::with_offset_minutes(120);
        assert_eq!(r.format_overlay(new_year_noon()), "01.01.2024 14:00:00");
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let r = TimestampRenderer::with_offset_minutes(100_000);
        assert_eq!(r.format_overlay(new_year_noon()), "01.01.2024 12:00:00");
    }

    #[test]
    fn test_off_draws_nothing() {
        let mut canvas = blank();
        TimestampRenderer::utc().render(
            TimestampMode::Off,
            new_year_noon(),
            FontChoice::Typewriter,
            &FontSet::builtin(),
            &mut canvas,
        );
        assert!(canvas.pixels().all(|p| *p == frame::BACKGROUND));
    }

    #[test]
    fn test_overlay_stays_inside_photo_area() {
        let mut canvas = blank();
        TimestampRenderer::utc().render(
            TimestampMode::Overlay,
            new_year_noon(),
            FontChoice::Typewriter,
            &FontSet::builtin(),
            &mut canvas,
        );
        let mut inked = 0;
        for (x, y, p) in canvas.enumerate_pixels() {
            if *p != frame::BACKGROUND {
                inked += 1;
                assert!(x >= frame::PADDING && x < frame::IMAGE_RIGHT, "x={x}");
                assert!(y >= frame::PADDING && y < frame::IMAGE_BOTTOM, "y={y}");
                assert!(x > frame::IMAGE_RIGHT / 2, "should sit on the right half");
            }
        }
        assert!(inked > 0);
    }

    #[test]
    fn test_text_mode_sits_in_bottom_band() {
        let mut canvas = blank();
        TimestampRenderer::utc().render(
            TimestampMode::Text,
            new_year_noon(),
            FontChoice::Clean,
            &FontSet::builtin(),
            &mut canvas,
        );
        let mut inked = 0;
        for (_, y, p) in canvas.enumerate_pixels() {
            if *p != frame::BACKGROUND {
                inked += 1;
                assert!(y > frame::IMAGE_BOTTOM, "y={y}");
            }
        }
        assert!(inked > 0);
    }

    #[test]
    fn test_rerender_is_idempotent() {
        let fonts = FontSet::builtin();
        let draw = || {
            let mut canvas = blank();
            TimestampRenderer::utc().render(
                TimestampMode::Overlay,
                new_year_noon(),
                FontChoice::Typewriter,
                &fonts,
                &mut canvas,
            );
            canvas
        };
        assert_eq!(draw().as_raw(), draw().as_raw());
    }
}
