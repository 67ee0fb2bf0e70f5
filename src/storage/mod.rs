//! # Moment Storage
//!
//! Persists the most recent prints so they can be browsed and re-edited.
//!
//! ## Layout
//!
//! Each [`StoredMoment`] serializes as:
//!
//! ```json
//! {
//!   "id": 1704110400000,
//!   "data": "data:image/jpeg;base64,...",
//!   "raw": "data:image/jpeg;base64,...",
//!   "caption": "Hello World",
//!   "filterEnabled": true,
//!   "font": "typewriter",
//!   "timestampMode": "overlay",
//!   "timestamp": "2024-01-01T12:00:00Z"
//! }
//! ```
//!
//! ## Collection rules
//!
//! - Most recent first, at most [`CAPACITY`] entries; the oldest is evicted silently.
//! - Putting an id that already exists replaces that entry in place.
//! - Every mutation reads the whole collection, changes it, and writes it
//!   back in one [`MomentStore::save`]. Stores make that write atomic.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capture::{self, RawCapture};
use crate::compose::PrintArtifact;
use crate::error::{DecodeError, StorageError};
use crate::style::{FontChoice, StyleParameters, TimestampMode};

/// Most moments kept at once.
pub const CAPACITY: usize = 10;

/// A persisted print with enough to re-edit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMoment {
    pub id: u64,
    /// Final print as a JPEG data URI.
    pub data: String,
    /// Raw capture as a JPEG data URI.
    pub raw: String,
    pub caption: String,
    pub filter_enabled: bool,
    pub font: FontChoice,
    pub timestamp_mode: TimestampMode,
    /// Capture time.
    pub timestamp: DateTime<Utc>,
}

impl StoredMoment {
    /// Build a moment from a composed print and the encoded capture it came from.
    pub fn from_artifact(id: u64, artifact: &PrintArtifact, raw: String) -> Self {
        Self {
            id,
            data: artifact.to_data_uri(),
            raw,
            caption: artifact.style.caption.clone(),
            filter_enabled: artifact.style.filter_enabled,
            font: artifact.style.font,
            timestamp_mode: artifact.style.timestamp_mode,
            timestamp: artifact.captured_at,
        }
    }

    pub fn style(&self) -> StyleParameters {
        StyleParameters {
            filter_enabled: self.filter_enabled,
            font: self.font,
            timestamp_mode: self.timestamp_mode,
            caption: self.caption.clone(),
        }
    }

    /// Decode a fresh copy of the raw capture.
    pub fn raw_capture(&self) -> Result<RawCapture, DecodeError> {
        capture::decode_data_uri(&self.raw)
    }

    /// Encoded bytes of the final print.
    pub fn print_bytes(&self) -> Result<Vec<u8>, DecodeError> {
        crate::codec::from_data_uri(&self.data)
    }
}

/// Backing store for the whole collection.
pub trait MomentStore: Send {
    /// Read the collection. A store that was never written is empty.
    fn load(&self) -> Result<Vec<StoredMoment>, StorageError>;

    /// Replace the collection.
    fn save(&mut self, moments: &[StoredMoment]) -> Result<(), StorageError>;
}

/// The bounded most-recent-first collection.
#[derive(Debug)]
pub struct RecentMoments<S> {
    store: S,
}

impl<S: MomentStore> RecentMoments<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All moments, most recent first.
    pub fn list(&self) -> Result<Vec<StoredMoment>, StorageError> {
        self.store.load()
    }

    pub fn get(&self, id: u64) -> Result<Option<StoredMoment>, StorageError> {
        Ok(self.list()?.into_iter().find(|m| m.id == id))
    }

    /// Insert at the front, or replace the entry with the same id in place.
    pub fn put(&mut self, moment: StoredMoment) -> Result<(), StorageError> {
        let mut moments = self.store.load()?;
        if let Some(existing) = moments.iter_mut().find(|m| m.id == moment.id) {
            *existing = moment;
        } else {
            moments.insert(0, moment);
            if moments.len() > CAPACITY {
                let evicted: Vec<u64> = moments.drain(CAPACITY..).map(|m| m.id).collect();
                tracing::debug!(?evicted, "evicted oldest moments");
            }
        }
        self.store.save(&moments)
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: u64) -> Result<bool, StorageError> {
        let mut moments = self.store.load()?;
        let before = moments.len();
        moments.retain(|m| m.id != id);
        if moments.len() == before {
            return Ok(false);
        }
        self.store.save(&moments)?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.save(&[])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    pub(crate) fn moment(id: u64) -> StoredMoment {
        StoredMoment {
            id,
            data: "data:image/jpeg;base64,AA==".to_string(),
            raw: "data:image/jpeg;base64,AA==".to_string(),
            caption: format!("moment {}", id),
            filter_enabled: true,
            font: FontChoice::Typewriter,
            timestamp_mode: TimestampMode::Off,
            timestamp: Utc.timestamp_millis_opt(id as i64).unwrap(),
        }
    }

    fn ids(recent: &RecentMoments<MemoryStore>) -> Vec<u64> {
        recent.list().unwrap().iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_json_layout() {
        let mut m = moment(1704110400000);
        m.timestamp_mode = TimestampMode::Overlay;
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["id"], 1704110400000u64);
        assert_eq!(value["filterEnabled"], true);
        assert_eq!(value["font"], "typewriter");
        assert_eq!(value["timestampMode"], "overlay");
        assert_eq!(value["timestamp"], "2024-01-01T12:00:00Z");
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 8);
    }

    #[test]
    fn test_put_is_most_recent_first() {
        let mut recent = RecentMoments::new(MemoryStore::default());
        recent.put(moment(1)).unwrap();
        recent.put(moment(2)).unwrap();
        recent.put(moment(3)).unwrap();
        assert_eq!(ids(&recent), vec![3, 2, 1]);
    }

    #[test]
    fn test_eleventh_put_evicts_oldest() {
        let mut recent = RecentMoments::new(MemoryStore::default());
        for id in 1..=10 {
            recent.put(moment(id)).unwrap();
        }
        recent.put(moment(11)).unwrap();
        let list = ids(&recent);
        assert_eq!(list.len(), 10);
        assert_eq!(list[0], 11);
        assert!(!list.contains(&1));
    }

    #[test]
    fn test_put_same_id_replaces_in_place() {
        let mut recent = RecentMoments::new(MemoryStore::default());
        recent.put(moment(1)).unwrap();
        recent.put(moment(2)).unwrap();
        let mut edited = moment(1);
        edited.caption = "edited".to_string();
        recent.put(edited).unwrap();
        assert_eq!(ids(&recent), vec![2, 1]);
        assert_eq!(recent.get(1).unwrap().unwrap().caption, "edited");
    }

    #[test]
    fn test_remove_and_clear() {
        let mut recent = RecentMoments::new(MemoryStore::default());
        recent.put(moment(1)).unwrap();
        recent.put(moment(2)).unwrap();
        assert!(recent.remove(1).unwrap());
        assert!(!recent.remove(1).unwrap());
        assert_eq!(ids(&recent), vec![2]);
        recent.clear().unwrap();
        assert!(recent.list().unwrap().is_empty());
    }

    #[test]
    fn test_failed_save_leaves_collection_untouched() {
        let mut recent = RecentMoments::new(MemoryStore::with_quota(1));
        assert!(matches!(
            recent.put(moment(1)),
            Err(StorageError::QuotaExceeded { .. })
        ));
        assert!(recent.list().unwrap().is_empty());
    }

    #[test]
    fn test_style_round_trips_through_moment() {
        let m = moment(5);
        let style = m.style();
        assert_eq!(style.caption, "moment 5");
        assert!(style.filter_enabled);
        assert_eq!(style.font, FontChoice::Typewriter);
    }
}
