//! # Rendering Module
//!
//! Raster building blocks for the print.
//!
//! ## Modules
//!
//! - [`crop`]: Cover-crop of the raw capture into the square photo area
//! - [`grade`]: Instant-film color grade (sepia, contrast, brightness, saturation)
//! - [`canvas`]: Alpha-blended text drawing with optional drop shadow
//!
//! ## Usage Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use polaroid::render::{crop, grade};
//!
//! let raw = RgbaImage::from_pixel(1280, 720, Rgba([120, 90, 60, 255]));
//! let mut square = crop::cover_crop(&raw, 880);
//! assert_eq!(square.dimensions(), (880, 880));
//!
//! let outcome = grade::apply_filter(&mut square);
//! assert_eq!(outcome, grade::FilterOutcome::Graded);
//! ```

pub mod canvas;
pub mod crop;
pub mod grade;
