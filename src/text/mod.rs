//! # Text
//!
//! Faces, measurement and caption layout for the print's text band.
//!
//! ## Architecture
//!
//! ```text
//! FontChoice ─→ FontSet ─→ Face ─┬─ measure(text, px) ─→ CaptionLayoutEngine
//!                                └─ rasterize(text, px) ─→ TextMask ─→ canvas
//! ```
//!
//! Every [`FontChoice`] maps to a built-in Spleen bitmap face unless the
//! studio config points it at a TTF file.

pub mod font;
pub mod layout;
pub mod ttf_font;

pub use font::BitmapFace;
pub use layout::{CaptionLayout, layout_caption};
pub use ttf_font::TtfFace;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PolaroidError;
use crate::style::FontChoice;

/// Caption pixel height per font at canonical print size.
pub fn caption_px(font: FontChoice) -> f32 {
    match font {
        FontChoice::Typewriter => 40.0,
        FontChoice::Handwritten => 36.0,
        FontChoice::Clean => 40.0,
    }
}

/// Rasterized text coverage. 0.0 = no ink, 1.0 = full ink.
#[derive(Debug, Clone)]
pub struct TextMask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl TextMask {
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Set coverage; out-of-bounds writes are dropped.
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    /// Add coverage, clamped to 1.0.
    pub fn accumulate(&mut self, x: usize, y: usize, coverage: f32) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            self.data[idx] = (self.data[idx] + coverage).min(1.0);
        }
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }
}

/// A face that can measure and rasterize single lines.
#[derive(Debug, Clone)]
pub enum Face {
    Bitmap(BitmapFace),
    Ttf(TtfFace),
}

impl Face {
    pub fn measure(&self, text: &str, pixel_height: f32) -> f32 {
        match self {
            Face::Bitmap(face) => face.measure(text, pixel_height),
            Face::Ttf(face) => face.measure(text, pixel_height),
        }
    }

    pub fn rasterize(&self, text: &str, pixel_height: f32) -> TextMask {
        match self {
            Face::Bitmap(face) => face.rasterize(text, pixel_height),
            Face::Ttf(face) => face.rasterize(text, pixel_height),
        }
    }
}

/// Optional TTF overrides, one per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPaths {
    pub typewriter: Option<PathBuf>,
    pub handwritten: Option<PathBuf>,
    pub clean: Option<PathBuf>,
    pub mono: Option<PathBuf>,
}

/// The faces a composer draws with.
#[derive(Debug, Clone)]
pub struct FontSet {
    typewriter: Face,
    handwritten: Face,
    clean: Face,
    mono: Face,
}

impl Default for FontSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontSet {
    /// Built-in bitmap faces only.
    pub fn builtin() -> Self {
        Self {
            typewriter: Face::Bitmap(BitmapFace::spleen_12x24()),
            handwritten: Face::Bitmap(BitmapFace::spleen_6x12()),
            clean: Face::Bitmap(BitmapFace::spleen_8x16()),
            mono: Face::Bitmap(BitmapFace::spleen_12x24()),
        }
    }

    /// Built-in faces with any configured TTF files swapped in.
    pub fn load(paths: &FontPaths) -> Result<Self, PolaroidError> {
        let mut set = Self::builtin();
        let slots = [
            (&paths.typewriter, &mut set.typewriter),
            (&paths.handwritten, &mut set.handwritten),
            (&paths.clean, &mut set.clean),
            (&paths.mono, &mut set.mono),
        ];
        for (path, slot) in slots {
            if let Some(path) = path {
                tracing::debug!(path = %path.display(), "loading caption font");
                *slot = Face::Ttf(TtfFace::from_file(path)?);
            }
        }
        Ok(set)
    }

    pub fn face(&self, font: FontChoice) -> &Face {
        match font {
            FontChoice::Typewriter => &self.typewriter,
            FontChoice::Handwritten => &self.handwritten,
            FontChoice::Clean => &self.clean,
        }
    }

    /// Monospace face used by the overlay timestamp.
    pub fn mono(&self) -> &Face {
        &self.mono
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_faces_differ_in_width() {
        let set = FontSet::builtin();
        let widths: Vec<f32> = FontChoice::ALL
            .iter()
            .map(|&f| set.face(f).measure("abc", caption_px(f)))
            .collect();
        assert_eq!(widths, vec![60.0, 54.0, 60.0]);
    }

    #[test]
    fn test_load_without_overrides_is_builtin() {
        let set = FontSet::load(&FontPaths::default()).unwrap();
        assert!(matches!(set.mono(), Face::Bitmap(_)));
    }

    #[test]
    fn test_load_reports_bad_path() {
        let paths = FontPaths {
            clean: Some(PathBuf::from("/nonexistent/clean.ttf")),
            ..Default::default()
        };
        assert!(matches!(FontSet::load(&paths), Err(PolaroidError::Font(_))));
    }

    #[test]
    fn test_mask_accumulate_clamps() {
        let mut mask = TextMask::blank(2, 2);
        mask.accumulate(1, 1, 0.7);
        mask.accumulate(1, 1, 0.7);
        mask.accumulate(5, 5, 1.0);
        assert_eq!(mask.get(1, 1), 1.0);
        assert_eq!(mask.get(0, 0), 0.0);
    }
}
