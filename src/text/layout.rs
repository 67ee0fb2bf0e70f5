//! # Caption Layout
//!
//! Greedy word wrap into at most two lines.
//!
//! ## Rules
//!
//! - Words are appended to the current line while the measured width of
//!   `line + " " + word` stays strictly below `max_width`.
//! - A word that does not fit starts a new line. A single word wider than
//!   `max_width` sits alone on its line, unbroken.
//! - Explicit newlines in the caption force a break.
//! - Anything past the second line is dropped.
//!
//! ## Vertical placement
//!
//! ```text
//! one line:   ───── anchor ─────       (centered on the anchor)
//!
//! two lines:  ───── anchor - lh/2 ──
//!             ───── anchor + lh/2 ──
//! ```

use crate::style::{FontChoice, MAX_CAPTION_LINES};

use super::caption_px;

/// Result of laying out a caption.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    pub lines: Vec<String>,
    pub line_height: f32,
}

impl CaptionLayout {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Vertical center of each line around `anchor_y`.
    pub fn line_centers(&self, anchor_y: f32) -> Vec<f32> {
        let n = self.lines.len() as f32;
        (0..self.lines.len())
            .map(|i| anchor_y + (i as f32 - (n - 1.0) / 2.0) * self.line_height)
            .collect()
    }
}

/// Line height for a caption font.
pub fn line_height(font: FontChoice) -> f32 {
    (caption_px(font) * 1.25).round()
}

/// Lay out `caption` using `measure` as the width oracle.
pub fn layout_caption<M>(caption: &str, font: FontChoice, measure: M, max_width: f32) -> CaptionLayout
where
    M: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    for paragraph in caption.split('\n') {
        lines.extend(wrap_words(paragraph, &measure, max_width));
        if lines.len() >= MAX_CAPTION_LINES {
            break;
        }
    }
    lines.truncate(MAX_CAPTION_LINES);

    CaptionLayout {
        lines,
        line_height: line_height(font),
    }
}

/// Greedy wrap of a single paragraph. Whitespace-only input yields no lines.
pub fn wrap_words<M>(text: &str, measure: M, max_width: f32) -> Vec<String>
where
    M: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut words = text.split_whitespace();

    let Some(first) = words.next() else {
        return lines;
    };
    let mut current = first.to_string();

    for word in words {
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);

    lines
}
