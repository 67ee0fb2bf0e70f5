//! # Studio Configuration
//!
//! Loaded from an optional JSON file, then overridden by command-line flags.
//!
//! ```json
//! {
//!   "store_path": "polaroid-moments.json",
//!   "store_quota_bytes": 5242880,
//!   "export_dir": ".",
//!   "autosave_delay_ms": 1000,
//!   "jpeg_quality": 85,
//!   "utc_offset_minutes": 60,
//!   "fonts": {
//!     "typewriter": "fonts/SpecialElite-Regular.ttf",
//!     "handwritten": "fonts/Caveat-Regular.ttf"
//!   },
//!   "listen_addr": "127.0.0.1:8080"
//! }
//! ```
//!
//! Every key is optional. Unknown keys are rejected to catch typos early.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compose::PrintComposer;
use crate::error::PolaroidError;
use crate::storage::JsonFileStore;
use crate::text::{FontPaths, FontSet};
use crate::timestamp::TimestampRenderer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// JSON file holding recent moments.
    pub store_path: PathBuf,
    /// Largest the store file may grow, in bytes.
    pub store_quota_bytes: Option<usize>,
    /// Where downloads land.
    pub export_dir: PathBuf,
    /// Quiet period before an auto-save.
    pub autosave_delay_ms: u64,
    /// Quality of the final print (1-100).
    pub jpeg_quality: u8,
    /// Offset used when formatting capture times.
    pub utc_offset_minutes: i32,
    pub fonts: FontPaths,
    pub listen_addr: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("polaroid-moments.json"),
            store_quota_bytes: None,
            export_dir: PathBuf::from("."),
            autosave_delay_ms: 1000,
            jpeg_quality: crate::codec::PRINT_QUALITY,
            utc_offset_minutes: 0,
            fonts: FontPaths::default(),
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl StudioConfig {
    /// Read a config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, PolaroidError> {
        let content = fs::read_to_string(path)
            .map_err(|e| PolaroidError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| PolaroidError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PolaroidError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(PolaroidError::Config(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if self.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(PolaroidError::Config(format!(
                "utc_offset_minutes must be within ±1439, got {}",
                self.utc_offset_minutes
            )));
        }
        if self.listen_addr.trim().is_empty() {
            return Err(PolaroidError::Config("listen_addr is empty".to_string()));
        }
        Ok(())
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// Composer with the configured faces, offset and quality.
    pub fn composer(&self) -> Result<PrintComposer, PolaroidError> {
        let fonts = FontSet::load(&self.fonts)?;
        let timestamps = TimestampRenderer::with_offset_minutes(self.utc_offset_minutes);
        Ok(PrintComposer::new(fonts, timestamps).with_jpeg_quality(self.jpeg_quality))
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.store_path).with_quota(self.store_quota_bytes)
    }
}
