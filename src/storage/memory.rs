//! In-process store, used by tests and by the server when no file is configured.

use super::{MomentStore, StoredMoment};
use crate::error::StorageError;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    moments: Vec<StoredMoment>,
    /// Serialized-size limit, mirroring a browser storage quota.
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn with_quota(quota: usize) -> Self {
        Self {
            moments: Vec::new(),
            quota: Some(quota),
        }
    }
}

impl MomentStore for MemoryStore {
    fn load(&self) -> Result<Vec<StoredMoment>, StorageError> {
        Ok(self.moments.clone())
    }

    fn save(&mut self, moments: &[StoredMoment]) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = serde_json::to_vec(moments)?.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.moments = moments.to_vec();
        Ok(())
    }
}
