//! # Error Types
//!
//! This module defines error types used throughout the polaroid library.
//!
//! | Error | Raised by | Effect on a compose |
//! |-------|-----------|---------------------|
//! | [`GradeError`] | color grader | aborts, or triggers the approximate filter inside the composer |
//! | [`DecodeError`] | capture decode | aborts, nothing persisted |
//! | [`StyleError`] | caption entry | rejected before composing |
//! | [`StorageError`] | moment store | logged, compose result still returned |
//! | [`ExportError`] | export gateway | terminal for that export, retryable |

use std::path::PathBuf;
use thiserror::Error;

/// Malformed pixel input to the color grader.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradeError {
    #[error("Invalid pixel buffer: {len} bytes for {width}x{height} RGBA")]
    InvalidBuffer { len: usize, width: u32, height: u32 },
}

/// Raw capture could not be turned into a bitmap.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image has zero dimensions ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Malformed data URI: {0}")]
    DataUri(String),

    #[error("Failed to decode HEIC: {0}")]
    Heic(String),

    #[error("Decode task failed: {0}")]
    Task(String),
}

/// Entry-level validation of style edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("Caption is {len} characters, {font} allows at most {max}")]
    CaptionTooLong { len: usize, max: usize, font: String },

    #[error("Caption has {lines} lines, at most 2 are allowed")]
    TooManyLines { lines: usize },
}

/// Persistence failures. Never fatal to a compose.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// Native share hand-off outcome other than success.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShareError {
    /// The user dismissed the share sheet.
    #[error("Share cancelled")]
    Cancelled,

    #[error("Share failed: {0}")]
    Failed(String),
}

/// Both the share hand-off and the download fallback failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export failed: {cause}")]
    Failed { cause: String },
}

/// Errors surfaced by the print composer.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Grade(#[from] GradeError),

    #[error("Failed to encode print: {0}")]
    Encode(String),
}

/// Main error type for polaroid operations
#[derive(Debug, Error)]
pub enum PolaroidError {
    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// Configuration file or flag problems
    #[error("Config error: {0}")]
    Config(String),

    /// Font loading problems
    #[error("Font error: {0}")]
    Font(String),

    /// No capture is loaded into the editing session
    #[error("No active capture")]
    NoCapture,

    #[error("Moment {0} not found")]
    MomentNotFound(u64),

    /// A blocking or spawned task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),

    /// Server-level errors (bind, accept)
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
