//! # Print Style
//!
//! The user-editable parameters of a print: filter toggle, caption font,
//! timestamp mode and the caption itself.
//!
//! Captions are validated when they are entered, so a [`StyleParameters`]
//! that made it past [`StyleParameters::validate`] can always be composed.
//!
//! | Font | Max caption length |
//! |------|--------------------|
//! | Typewriter | 50 |
//! | Handwritten | 70 |
//! | Clean | 50 |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StyleError;

/// Maximum number of logical (newline separated) caption lines.
pub const MAX_CAPTION_LINES: usize = 2;

/// Caption typeface.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FontChoice {
    #[default]
    Typewriter,
    Handwritten,
    Clean,
}

impl FontChoice {
    pub const ALL: [FontChoice; 3] = [
        FontChoice::Typewriter,
        FontChoice::Handwritten,
        FontChoice::Clean,
    ];

    /// Maximum caption length in characters for this font.
    pub fn max_caption_len(self) -> usize {
        match self {
            FontChoice::Typewriter | FontChoice::Clean => 50,
            FontChoice::Handwritten => 70,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FontChoice::Typewriter => "typewriter",
            FontChoice::Handwritten => "handwritten",
            FontChoice::Clean => "clean",
        }
    }
}

impl fmt::Display for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where (and whether) the capture time is drawn on the print.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    #[default]
    Off,
    /// Date-stamp style label inside the photo, bottom-right.
    Overlay,
    /// Printed line in the caption font below the caption.
    Text,
}

/// Style of a single print. Plain value type, copied per compose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleParameters {
    #[serde(default = "default_true")]
    pub filter_enabled: bool,
    #[serde(default)]
    pub font: FontChoice,
    #[serde(default)]
    pub timestamp_mode: TimestampMode,
    #[serde(default)]
    pub caption: String,
}

fn default_true() -> bool {
    true
}

impl Default for StyleParameters {
    fn default() -> Self {
        Self {
            filter_enabled: true,
            font: FontChoice::default(),
            timestamp_mode: TimestampMode::default(),
            caption: String::new(),
        }
    }
}

impl StyleParameters {
    /// Check the caption against the font's length cap and the line cap.
    pub fn validate(&self) -> Result<(), StyleError> {
        validate_caption(&self.caption, self.font)
    }

    /// Replace the caption, rejecting input the current font cannot hold.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Result<Self, StyleError> {
        let caption = caption.into();
        validate_caption(&caption, self.font)?;
        self.caption = caption;
        Ok(self)
    }

    /// Switch fonts. Fails if the existing caption is too long for the new font.
    pub fn with_font(mut self, font: FontChoice) -> Result<Self, StyleError> {
        validate_caption(&self.caption, font)?;
        self.font = font;
        Ok(self)
    }

    pub fn with_filter(mut self, enabled: bool) -> Self {
        self.filter_enabled = enabled;
        self
    }

    pub fn with_timestamp(mut self, mode: TimestampMode) -> Self {
        self.timestamp_mode = mode;
        self
    }
}

/// Entry-level caption validation.
///
/// Length is counted in characters, not bytes.
pub fn validate_caption(caption: &str, font: FontChoice) -> Result<(), StyleError> {
    let len = caption.chars().count();
    let max = font.max_caption_len();
    if len > max {
        return Err(StyleError::CaptionTooLong {
            len,
            max,
            font: font.to_string(),
        });
    }

    let lines = caption.split('\n').count();
    if lines > MAX_CAPTION_LINES {
        return Err(StyleError::TooManyLines { lines });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_cap_is_font_dependent() {
        let caption = "a".repeat(51);
        assert!(matches!(
            validate_caption(&caption, FontChoice::Typewriter),
            Err(StyleError::CaptionTooLong { len: 51, max: 50, .. })
        ));
        assert!(validate_caption(&caption, FontChoice::Handwritten).is_ok());
        assert!(validate_caption(&caption, FontChoice::Clean).is_err());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let caption = "é".repeat(50);
        assert!(caption.len() > 50);
        assert!(validate_caption(&caption, FontChoice::Typewriter).is_ok());
    }

    #[test]
    fn test_three_logical_lines_rejected() {
        assert_eq!(
            validate_caption("a\nb\nc", FontChoice::Clean),
            Err(StyleError::TooManyLines { lines: 3 })
        );
        assert!(validate_caption("a\nb", FontChoice::Clean).is_ok());
    }

    #[test]
    fn test_font_switch_revalidates_caption() {
        let style = StyleParameters::default()
            .with_font(FontChoice::Handwritten)
            .unwrap()
            .with_caption("x".repeat(60))
            .unwrap();

        assert!(style.clone().with_font(FontChoice::Typewriter).is_err());
        assert!(style.with_font(FontChoice::Handwritten).is_ok());
    }

    #[test]
    fn test_serde_shape() {
        let style = StyleParameters::default()
            .with_timestamp(TimestampMode::Overlay)
            .with_caption("hi")
            .unwrap();
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "filterEnabled": true,
                "font": "typewriter",
                "timestampMode": "overlay",
                "caption": "hi",
            })
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let style: StyleParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(style, StyleParameters::default());
    }
}
