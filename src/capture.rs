//! # Raw Captures
//!
//! The bitmap a print is composed from, plus where it came from.
//!
//! ## Sources
//!
//! ```text
//! camera frame ──→ snapshot_from_frame ──┐   (center square, mirrored for the front camera)
//! imported file ─→ decode / decode_async ─┼──→ RawCapture
//! stored moment ─→ from_data_uri ────────┘   (fresh copy for re-edit)
//! ```
//!
//! A [`RawCapture`] never changes after construction and always has
//! nonzero dimensions.

use image::{DynamicImage, RgbaImage, imageops};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::DecodeError;
use crate::render::crop::CoverCrop;

/// Which way the camera was facing, or whether the bitmap was imported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// User-facing camera. Snapshots are mirrored.
    Front,
    Back,
    #[default]
    Imported,
}

/// Immutable raw bitmap (RGBA8).
#[derive(Debug, Clone, PartialEq)]
pub struct RawCapture {
    image: RgbaImage,
    provenance: Provenance,
}

impl RawCapture {
    pub fn new(image: RgbaImage, provenance: Provenance) -> Result<Self, DecodeError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::Empty { width, height });
        }
        Ok(Self { image, provenance })
    }

    /// Decode encoded image bytes (JPEG, PNG, ...; HEIC with the `heif` feature).
    pub fn decode(bytes: &[u8], provenance: Provenance) -> Result<Self, DecodeError> {
        let image = decode_dynamic(bytes)?;
        Self::new(image.to_rgba8(), provenance)
    }

    /// Decode off the async executor. This is the only await point before composing.
    pub async fn decode_async(bytes: Vec<u8>, provenance: Provenance) -> Result<Self, DecodeError> {
        tokio::task::spawn_blocking(move || Self::decode(&bytes, provenance))
            .await
            .map_err(|e| DecodeError::Task(e.to_string()))?
    }

    /// Decode a `data:` URI as produced for stored moments.
    pub fn from_data_uri(uri: &str, provenance: Provenance) -> Result<Self, DecodeError> {
        let bytes = codec::from_data_uri(uri)?;
        Self::decode(&bytes, provenance)
    }

    /// JPEG data URI of the raw bitmap, for persistence.
    pub fn to_data_uri(&self) -> Result<String, image::ImageError> {
        let bytes = codec::encode_jpeg(&self.image, codec::RAW_QUALITY)?;
        Ok(codec::to_data_uri(&bytes, codec::JPEG_MIME))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode a stored `data:` URI into a fresh, independent capture.
pub fn decode_data_uri(uri: &str) -> Result<RawCapture, DecodeError> {
    RawCapture::from_data_uri(uri, Provenance::Imported)
}

/// Turn a live camera frame into a square capture.
///
/// Crops the centered square at native resolution and mirrors front-camera
/// frames so the capture matches the viewfinder.
pub fn snapshot_from_frame(frame: &RgbaImage, facing: Provenance) -> Result<RawCapture, DecodeError> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty { width, height });
    }

    let crop = CoverCrop::for_dimensions(width, height);
    let mut square = imageops::crop_imm(frame, crop.x, crop.y, crop.size, crop.size).to_image();
    if facing == Provenance::Front {
        imageops::flip_horizontal_in_place(&mut square);
    }
    RawCapture::new(square, facing)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    #[cfg(feature = "heif")]
    if is_heic(bytes) {
        return heif::decode_heic(bytes);
    }

    Ok(image::load_from_memory(bytes)?)
}

/// Check if the data looks like a HEIC/HEIF file by examining magic bytes.
/// HEIC files have an "ftyp" box near the start with HEIC-related brand codes.
pub fn is_heic(data: &[u8]) -> bool {
    if data.len() < 12 || &data[4..8] != b"ftyp" {
        return false;
    }

    matches!(
        &data[8..12],
        b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis" | b"hevm" | b"hevs" | b"mif1" | b"msf1"
    )
}

#[cfg(feature = "heif")]
mod heif {
    use image::{DynamicImage, RgbImage};
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    use crate::error::DecodeError;

    /// Decode a HEIC/HEIF image using libheif.
    pub(super) fn decode_heic(data: &[u8]) -> Result<DynamicImage, DecodeError> {
        let lib_heif = LibHeif::new();
        let ctx = HeifContext::read_from_bytes(data)
            .map_err(|e| DecodeError::Heic(format!("Failed to read HEIC: {}", e)))?;
        let handle = ctx
            .primary_image_handle()
            .map_err(|e| DecodeError::Heic(format!("Failed to get primary image: {}", e)))?;
        let image = lib_heif
            .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
            .map_err(|e| DecodeError::Heic(format!("Failed to decode HEIC image: {}", e)))?;

        let planes = image.planes();
        let interleaved = planes
            .interleaved
            .ok_or_else(|| DecodeError::Heic("No interleaved RGB data in HEIC".to_string()))?;

        let (width, height) = (image.width(), image.height());
        let stride = interleaved.stride;
        let data = interleaved.data;

        let mut rgb = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let offset = (y as usize * stride) + (x as usize * 3);
                if offset + 2 < data.len() {
                    rgb.put_pixel(
                        x,
                        y,
                        image::Rgb([data[offset], data[offset + 1], data[offset + 2]]),
                    );
                }
            }
        }

        Ok(DynamicImage::ImageRgb8(rgb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let capture = RawCapture::decode(&png_bytes(8, 4), Provenance::Imported).unwrap();
        assert_eq!((capture.width(), capture.height()), (8, 4));
        assert_eq!(capture.image().get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            RawCapture::decode(b"not an image", Provenance::Imported),
            Err(DecodeError::Image(_))
        ));
    }

    #[test]
    fn test_zero_sized_rejected() {
        assert!(matches!(
            RawCapture::new(RgbaImage::new(0, 5), Provenance::Back),
            Err(DecodeError::Empty { width: 0, height: 5 })
        ));
    }

    #[tokio::test]
    async fn test_decode_async_matches_sync() {
        let bytes = png_bytes(3, 3);
        let a = RawCapture::decode(&bytes, Provenance::Back).unwrap();
        let b = RawCapture::decode_async(bytes, Provenance::Back).await.unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_front_snapshot_is_square_and_mirrored() {
        // 6x4 frame: column index encoded in red.
        let mut frame = RgbaImage::new(6, 4);
        for (x, _, p) in frame.enumerate_pixels_mut() {
            *p = Rgba([x as u8, 0, 0, 255]);
        }

        let back = snapshot_from_frame(&frame, Provenance::Back).unwrap();
        assert_eq!(back.image().dimensions(), (4, 4));
        assert_eq!(back.image().get_pixel(0, 0).0[0], 1);

        let front = snapshot_from_frame(&frame, Provenance::Front).unwrap();
        assert_eq!(front.image().get_pixel(0, 0).0[0], 4);
        assert_eq!(front.provenance(), Provenance::Front);
    }

    #[test]
    fn test_data_uri_copy_is_independent() {
        let capture = RawCapture::decode(&png_bytes(12, 12), Provenance::Imported).unwrap();
        let uri = capture.to_data_uri().unwrap();
        let copy = decode_data_uri(&uri).unwrap();
        assert_eq!(copy.image().dimensions(), (12, 12));
    }

    #[test]
    fn test_heic_magic() {
        let mut data = vec![0, 0, 0, 24];
        data.extend_from_slice(b"ftypheic");
        assert!(is_heic(&data));
        assert!(!is_heic(&png_bytes(1, 1)));
    }
}
