//! # Print Composer
//!
//! Turns a [`RawCapture`] and a [`StyleParameters`] into a finished print.
//!
//! ## Pipeline
//!
//! ```text
//! RawCapture ─→ cover crop 880² ─→ grade? ─→ paste at (60,60) on white 1000×1200
//!                                                  │
//!                       caption lines (≤2) ←───────┘
//!                               │
//!                       timestamp (mode) ─→ JPEG q85 ─→ PrintArtifact
//! ```
//!
//! Composing is synchronous and deterministic: the same capture, style and
//! capture time always produce the same pixels and the same bytes. Callers on
//! an async executor run it inside `spawn_blocking`.

pub mod frame;

use chrono::{DateTime, Utc};
use image::{RgbaImage, imageops};

use crate::capture::RawCapture;
use crate::codec;
use crate::error::ComposeError;
use crate::render::canvas::{self, Anchor};
use crate::render::crop::cover_crop;
use crate::render::grade::{self, FilterOutcome};
use crate::style::StyleParameters;
use crate::text::layout::{CaptionLayout, layout_caption};
use crate::text::{FontSet, caption_px};
use crate::timestamp::TimestampRenderer;

/// A composed print.
#[derive(Debug, Clone)]
pub struct PrintArtifact {
    /// Full-resolution print, 1000×1200.
    pub image: RgbaImage,
    /// JPEG encoding of `image`.
    pub encoded: Vec<u8>,
    pub style: StyleParameters,
    pub captured_at: DateTime<Utc>,
    /// `None` when the filter was disabled.
    pub filter: Option<FilterOutcome>,
}

impl PrintArtifact {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encoded print as a `data:image/jpeg;base64,...` URI.
    pub fn to_data_uri(&self) -> String {
        codec::to_data_uri(&self.encoded, codec::JPEG_MIME)
    }
}

/// Composes prints with a fixed set of faces and a timestamp renderer.
#[derive(Debug, Clone)]
pub struct PrintComposer {
    fonts: FontSet,
    timestamps: TimestampRenderer,
    jpeg_quality: u8,
}

impl Default for PrintComposer {
    fn default() -> Self {
        Self::new(FontSet::builtin(), TimestampRenderer::utc())
    }
}

impl PrintComposer {
    pub fn new(fonts: FontSet, timestamps: TimestampRenderer) -> Self {
        Self {
            fonts,
            timestamps,
            jpeg_quality: codec::PRINT_QUALITY,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Render the print bitmap without encoding it.
    pub fn render(
        &self,
        raw: &RawCapture,
        style: &StyleParameters,
        captured_at: DateTime<Utc>,
    ) -> (RgbaImage, Option<FilterOutcome>) {
        let mut print = RgbaImage::from_pixel(frame::PRINT_WIDTH, frame::PRINT_HEIGHT, frame::BACKGROUND);

        let mut photo = cover_crop(raw.image(), frame::IMAGE_SIZE);
        let filter = style.filter_enabled.then(|| grade::apply_filter(&mut photo));
        imageops::overlay(&mut print, &photo, frame::PADDING as i64, frame::PADDING as i64);

        let layout = self.layout(style);
        let face = self.fonts.face(style.font);
        let px = caption_px(style.font);
        for (line, center_y) in layout.lines.iter().zip(layout.line_centers(frame::CAPTION_ANCHOR_Y)) {
            canvas::draw_text(
                &mut print,
                face,
                line,
                px,
                frame::PRINT_WIDTH as f32 / 2.0,
                center_y,
                Anchor::Center,
                frame::CAPTION_COLOR,
            );
        }

        self.timestamps
            .render(style.timestamp_mode, captured_at, style.font, &self.fonts, &mut print);

        (print, filter)
    }

    /// Lay out the caption for `style` with this composer's faces.
    pub fn layout(&self, style: &StyleParameters) -> CaptionLayout {
        let face = self.fonts.face(style.font);
        let px = caption_px(style.font);
        layout_caption(
            &style.caption,
            style.font,
            |s| face.measure(s, px),
            frame::CAPTION_MAX_WIDTH,
        )
    }

    /// Compose and encode a print.
    pub fn compose(
        &self,
        raw: &RawCapture,
        style: &StyleParameters,
        captured_at: DateTime<Utc>,
    ) -> Result<PrintArtifact, ComposeError> {
        let (image, filter) = self.render(raw, style, captured_at);
        let encoded = codec::encode_jpeg(&image, self.jpeg_quality)
            .map_err(|e| ComposeError::Encode(e.to_string()))?;

        tracing::debug!(
            font = %style.font,
            timestamp = ?style.timestamp_mode,
            filter = ?filter,
            bytes = encoded.len(),
            "composed print"
        );

        Ok(PrintArtifact {
            image,
            encoded,
            style: style.clone(),
            captured_at,
            filter,
        })
    }
}
