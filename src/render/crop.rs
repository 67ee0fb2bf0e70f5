//! Cover-crop: trim the longer side so the photo fills a square, keeping the center.
//!
//! ```text
//! landscape 1280x720            portrait 720x1280
//! ┌────┬──────────┬────┐        ┌──────────┐
//! │    │          │    │        ├──────────┤ 280
//! │280 │ 720x720  │280 │        │ 720x720  │
//! │    │          │    │        ├──────────┤ 280
//! └────┴──────────┴────┘        └──────────┘
//! ```

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Square region of a source bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverCrop {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl CoverCrop {
    /// Centered square crop for a `width x height` source.
    ///
    /// Odd differences round the offset down.
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        let size = width.min(height);
        Self {
            x: (width - size) / 2,
            y: (height - size) / 2,
            size,
        }
    }
}

/// Cover-crop `source` and scale the square to `target` pixels.
pub fn cover_crop(source: &RgbaImage, target: u32) -> RgbaImage {
    let crop = CoverCrop::for_dimensions(source.width(), source.height());
    let square = imageops::crop_imm(source, crop.x, crop.y, crop.size, crop.size).to_image();

    if crop.size == target {
        square
    } else {
        imageops::resize(&square, target, target, FilterType::Lanczos3)
    }
}
