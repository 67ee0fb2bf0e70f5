//! # Polaroid - Instant-Film Print Compositor
//!
//! Polaroid turns a raw capture into a framed, color-graded, captioned print
//! that looks like an instant-film photograph. It provides:
//!
//! - **Color grading**: sepia, contrast, brightness and saturation in one pixel pass
//! - **Composition**: cover-crop into a square photo area on a white 1000×1200 frame
//! - **Captions**: greedy word wrap into at most two centered lines
//! - **Timestamps**: camera-style overlay or a printed text line
//! - **Persistence**: the ten most recent prints, with debounced auto-save and re-edit
//! - **Export**: native share hand-off with a download fallback
//!
//! ## Quick Start
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use image::{Rgba, RgbaImage};
//! use polaroid::{
//!     capture::{Provenance, RawCapture},
//!     compose::PrintComposer,
//!     style::{StyleParameters, TimestampMode},
//! };
//!
//! let raw = RawCapture::new(
//!     RgbaImage::from_pixel(1280, 720, Rgba([180, 140, 100, 255])),
//!     Provenance::Imported,
//! )?;
//!
//! let style = StyleParameters::default()
//!     .with_caption("Hello World")?
//!     .with_timestamp(TimestampMode::Overlay);
//!
//! let captured_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
//! let print = PrintComposer::default().compose(&raw, &style, captured_at)?;
//!
//! assert_eq!((print.width(), print.height()), (1000, 1200));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`style`] | Style parameters and caption validation |
//! | [`capture`] | Raw captures, decoding, camera snapshots |
//! | [`render`] | Cover-crop, color grade, text drawing |
//! | [`text`] | Font faces and caption layout |
//! | [`timestamp`] | Timestamp formatting and placement |
//! | [`compose`] | The print composer and frame geometry |
//! | [`export`] | Share / download gateway |
//! | [`storage`] | Recent moments and their stores |
//! | [`session`] | Editing session with debounced auto-save |
//! | [`config`] | Studio configuration |
//! | [`server`] | Local HTTP surface |
//! | [`error`] | Error types |

pub mod capture;
pub mod codec;
pub mod compose;
pub mod config;
pub mod error;
pub mod export;
pub mod render;
pub mod server;
pub mod session;
pub mod storage;
pub mod style;
pub mod text;
pub mod timestamp;

// Re-exports for convenience
pub use capture::RawCapture;
pub use compose::{PrintArtifact, PrintComposer};
pub use error::PolaroidError;
pub use style::{FontChoice, StyleParameters, TimestampMode};
