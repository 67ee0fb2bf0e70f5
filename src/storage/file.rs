//! JSON file store.
//!
//! The whole collection lives in one JSON array. Writes go to a sibling
//! temp file which is then renamed over the original, so readers see either
//! the old or the new collection.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{MomentStore, StoredMoment};
use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    quota: Option<usize>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota: None,
        }
    }

    /// Reject writes whose serialized size exceeds `quota` bytes.
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl MomentStore for JsonFileStore {
    fn load(&self) -> Result<Vec<StoredMoment>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&mut self, moments: &[StoredMoment]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(moments)?;
        if let Some(quota) = self.quota {
            if bytes.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    needed: bytes.len(),
                    quota,
                });
            }
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, &bytes).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), count = moments.len(), bytes = bytes.len(), "saved moments");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecentMoments;
    use crate::storage::tests::moment;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nope.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("moments.json");

        let mut recent = RecentMoments::new(JsonFileStore::new(&path));
        recent.put(moment(1)).unwrap();
        recent.put(moment(2)).unwrap();

        let reopened = RecentMoments::new(JsonFileStore::new(&path));
        let list = reopened.list().unwrap();
        assert_eq!(list, vec![moment(2), moment(1)]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_quota_exceeded_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moments.json");

        let mut store = JsonFileStore::new(&path);
        store.save(&[moment(1)]).unwrap();
        let size = fs::metadata(&path).unwrap().len() as usize;

        let mut store = store.with_quota(Some(size + 10));
        let err = store.save(&[moment(2), moment(1)]).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota, .. } if quota == size + 10));
        assert_eq!(store.load().unwrap(), vec![moment(1)]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moments.json");
        fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            JsonFileStore::new(&path).load(),
            Err(StorageError::Serialize(_))
        ));
    }
}
