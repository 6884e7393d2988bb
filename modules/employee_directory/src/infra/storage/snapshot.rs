use std::sync::Arc;

use tracing::{debug, warn};

use super::BlobStore;
use crate::contract::model::Snapshot;
use crate::domain::repo::SnapshotRepository;

const PROBE_SUFFIX: &str = "__probe";

/// Stores the whole collection as one JSON blob under a fixed key.
pub struct BlobSnapshotStore {
    blobs: Arc<dyn BlobStore>,
    key: String,
}

impl BlobSnapshotStore {
    pub fn new(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the backing store accepts a write and a delete right now.
    pub fn is_available(&self) -> bool {
        let probe = format!("{}{PROBE_SUFFIX}", self.key);
        let res = self
            .blobs
            .set(&probe, "1")
            .and_then(|_| self.blobs.remove(&probe));
        if let Err(e) = &res {
            debug!(error = %e, "Storage probe failed");
        }
        res.is_ok()
    }
}

impl SnapshotRepository for BlobSnapshotStore {
    fn load(&self) -> Option<Snapshot> {
        let text = match self.blobs.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read snapshot");
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored snapshot is unreadable, ignoring it");
                None
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> bool {
        let text = match serde_json::to_string(snapshot) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to serialize snapshot");
                return false;
            }
        };

        match self.blobs.set(&self.key, &text) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to write snapshot");
                false
            }
        }
    }

    fn clear(&self) -> bool {
        match self.blobs.remove(&self.key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to remove snapshot");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{Employee, EmployeeId};
    use crate::infra::storage::MemoryBlobStore;
    use chrono::{TimeZone, Utc};

    fn snapshot() -> Snapshot {
        Snapshot {
            employees: vec![Employee {
                id: EmployeeId(1),
                first_name: "Ann".into(),
                last_name: "Lee".into(),
                email: "ann@x.com".into(),
                department: "Eng".into(),
                role: "Lead".into(),
                created_at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
                updated_at: None,
            }],
            last_updated: Utc.timestamp_millis_opt(1_700_000_500_000).unwrap(),
        }
    }

    #[test]
    fn save_then_load() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = BlobSnapshotStore::new(blobs.clone(), "k");

        assert!(store.save(&snapshot()));
        assert_eq!(store.load(), Some(snapshot()));

        let raw = blobs.raw("k").unwrap();
        assert!(raw.contains(r#""lastUpdated":"2023-11-14T22:21:40Z""#));
        assert!(raw.contains(r#""createdAt":"2023-11-14T22:13:20.123Z""#));
        assert!(!raw.contains("updatedAt"));
    }

    #[test]
    fn unreadable_blob_loads_as_none() {
        let blobs = Arc::new(MemoryBlobStore::new());
        blobs.put_raw("k", "{not json");
        let store = BlobSnapshotStore::new(blobs, "k");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn unavailable_store_degrades_quietly() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = BlobSnapshotStore::new(blobs.clone(), "k");
        assert!(store.is_available());
        assert!(blobs.raw("k__probe").is_none());

        blobs.set_available(false);
        assert!(!store.is_available());
        assert!(!store.save(&snapshot()));
        assert_eq!(store.load(), None);
        assert!(!store.clear());
    }

    #[test]
    fn clear_removes_the_blob() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = BlobSnapshotStore::new(blobs.clone(), "k");
        store.save(&snapshot());
        assert!(store.clear());
        assert!(blobs.raw("k").is_none());
    }
}
