//! # Retro Color Grade
//!
//! Per-pixel instant-film look applied to the square photo region.
//!
//! ## Pipeline
//!
//! Each pixel passes through four fixed steps, then a single clamp:
//!
//! ```text
//! RGB ─→ sepia 40% ─→ contrast ×1.2 ─→ brightness ×1.1 ─→ saturation 80% ─→ clamp → u8
//! ```
//!
//! The order is part of the look; the steps do not commute.
//!
//! ## Sepia matrix
//!
//! ```text
//! R' = 0.393 R + 0.769 G + 0.189 B
//! G' = 0.349 R + 0.686 G + 0.168 B
//! B' = 0.272 R + 0.534 G + 0.131 B
//! ```
//!
//! Alpha is left untouched.
//!
//! Arithmetic is `f64` and the final quantization rounds half to even, so
//! values landing exactly on `.5` go to the even neighbour.

use image::RgbaImage;
use image::imageops::colorops;

use crate::error::GradeError;

const SEPIA: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];
const SEPIA_AMOUNT: f64 = 0.4;
const SEPIA_KEEP: f64 = 0.6;
const CONTRAST: f64 = 1.2;
const BRIGHTNESS: f64 = 1.1;
const SATURATION: f64 = 0.8;
const DESATURATION: f64 = 0.2;
const LUMA: [f64; 3] = [0.2989, 0.5870, 0.1140];

/// How the filter ended up being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Exact per-pixel grade.
    Graded,
    /// Pixel pass failed; the whole-image approximation was used.
    Approximated,
}

/// Grade a single RGB triple. Output is clamped and quantized.
#[inline]
pub fn grade_rgb(rgb: [u8; 3]) -> [u8; 3] {
    let [r0, g0, b0] = rgb.map(f64::from);

    // 1. Sepia blend
    let mut c = [0.0f64; 3];
    for (i, row) in SEPIA.iter().enumerate() {
        let sepia = row[0] * r0 + row[1] * g0 + row[2] * b0;
        let orig = [r0, g0, b0][i];
        c[i] = orig * SEPIA_KEEP + sepia * SEPIA_AMOUNT;
    }

    // 2. Contrast around mid-gray, 3. brightness
    for v in &mut c {
        *v = ((*v - 128.0) * CONTRAST + 128.0) * BRIGHTNESS;
    }

    // 4. Saturation against post-brightness luma
    let gray = LUMA[0] * c[0] + LUMA[1] * c[1] + LUMA[2] * c[2];
    c.map(|v| quantize(v * SATURATION + gray * DESATURATION))
}

#[inline]
fn quantize(v: f64) -> u8 {
    v.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Grade a packed RGBA8 buffer in place.
///
/// Fails without touching the buffer when its length does not match
/// `width * height * 4`.
pub fn grade_pixels(pixels: &mut [u8], width: u32, height: u32) -> Result<(), GradeError> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected || expected == 0 {
        return Err(GradeError::InvalidBuffer {
            len: pixels.len(),
            width,
            height,
        });
    }

    for px in pixels.chunks_exact_mut(4) {
        let [r, g, b] = grade_rgb([px[0], px[1], px[2]]);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }

    Ok(())
}

/// Grade an image in place.
pub fn grade(image: &mut RgbaImage) -> Result<(), GradeError> {
    let (width, height) = image.dimensions();
    grade_pixels(image, width, height)
}

/// Whole-image approximation of the grade using stock color operations.
///
/// Close to [`grade`] but not bit-identical. Only used when the pixel
/// pass cannot run.
pub fn approximate(image: &mut RgbaImage) {
    // Warm tint first, as a flat blend toward the sepia tone of each pixel's luma.
    for px in image.pixels_mut() {
        let [r, g, b, _] = px.0;
        let l = LUMA[0] * r as f64 + LUMA[1] * g as f64 + LUMA[2] * b as f64;
        let tone = [l * 1.07, l * 0.95, l * 0.74];
        for i in 0..3 {
            let v = px.0[i] as f64 * SEPIA_KEEP + tone[i] * SEPIA_AMOUNT;
            px.0[i] = quantize(v);
        }
    }
    colorops::contrast_in_place(image, ((CONTRAST - 1.0) * 100.0) as f32);
    colorops::brighten_in_place(image, (255.0 * (BRIGHTNESS - 1.0) * 0.5) as i32);
}

/// Apply the grade, falling back to [`approximate`] if the pixel pass fails.
pub fn apply_filter(image: &mut RgbaImage) -> FilterOutcome {
    apply_filter_with(image, grade)
}

pub(crate) fn apply_filter_with<F>(image: &mut RgbaImage, pixel_pass: F) -> FilterOutcome
where
    F: FnOnce(&mut RgbaImage) -> Result<(), GradeError>,
{
    match pixel_pass(image) {
        Ok(()) => FilterOutcome::Graded,
        Err(e) => {
            tracing::warn!(error = %e, "pixel grade failed, using approximate filter");
            approximate(image);
            FilterOutcome::Approximated
        }
    }
}
