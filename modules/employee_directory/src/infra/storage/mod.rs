//! Key/value blob persistence and the snapshot adapter built on it.

pub mod file;
pub mod memory;
pub mod snapshot;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
pub use snapshot::BlobSnapshotStore;

/// Backing store for whole-value string blobs addressed by key.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}
