use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::bail;
use parking_lot::Mutex;

use super::BlobStore;

/// Process-local blob store.
///
/// Can be switched off to behave like a store the host has disabled: every
/// call then fails.
#[derive(Debug)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
    available: AtomicBool,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Stored value regardless of availability.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.blobs.lock().get(key).cloned()
    }

    /// Store `value` regardless of availability.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) {
        self.blobs.lock().insert(key.to_string(), value.into());
    }

    fn ensure_available(&self) -> anyhow::Result<()> {
        if !self.available.load(Ordering::SeqCst) {
            bail!("blob store is unavailable");
        }
        Ok(())
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.ensure_available()?;
        Ok(self.blobs.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.ensure_available()?;
        self.blobs.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.ensure_available()?;
        self.blobs.lock().remove(key);
        Ok(())
    }
}
