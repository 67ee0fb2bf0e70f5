//! Encoded image bytes and `data:` URIs.
//!
//! Prints and raw copies are persisted as base64 JPEG data URIs:
//!
//! ```text
//! data:image/jpeg;base64,/9j/4AAQSkZJRgABAQAAAQABAAD...
//! ```

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError, RgbaImage};

use crate::error::DecodeError;

pub const JPEG_MIME: &str = "image/jpeg";

/// Quality of the final print.
pub const PRINT_QUALITY: u8 = 85;
/// Quality of the persisted raw capture.
pub const RAW_QUALITY: u8 = 90;

/// Encode as baseline JPEG. Alpha is dropped.
///
/// The encoder is deterministic: equal pixels give equal bytes.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder.encode_image(&rgb)?;
    Ok(bytes)
}

/// Wrap bytes in a base64 `data:` URI.
pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Extract the payload of a base64 `data:` URI.
pub fn from_data_uri(uri: &str) -> Result<Vec<u8>, DecodeError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| DecodeError::DataUri("missing data: scheme".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| DecodeError::DataUri("missing payload separator".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(DecodeError::DataUri(format!(
            "unsupported encoding '{}'",
            meta
        )));
    }
    BASE64
        .decode(payload.trim())
        .map_err(|e| DecodeError::DataUri(format!("bad base64: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_jpeg_has_soi_marker_and_is_deterministic() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([200, 100, 50, 255]));
        let a = encode_jpeg(&img, PRINT_QUALITY).unwrap();
        let b = encode_jpeg(&img, PRINT_QUALITY).unwrap();
        assert_eq!(&a[..2], &[0xFF, 0xD8]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_data_uri_round_trip() {
        let uri = to_data_uri(b"hello", JPEG_MIME);
        assert_eq!(uri, "data:image/jpeg;base64,aGVsbG8=");
        assert_eq!(from_data_uri(&uri).unwrap(), b"hello");
    }

    #[test]
    fn test_rejects_non_data_uri() {
        assert!(matches!(
            from_data_uri("https://example.com/a.jpg"),
            Err(DecodeError::DataUri(_))
        ));
        assert!(from_data_uri("data:image/jpeg,plain").is_err());
        assert!(from_data_uri("data:image/jpeg;base64").is_err());
    }
}
