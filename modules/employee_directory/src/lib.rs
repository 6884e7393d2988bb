// === PUBLIC CONTRACT ===
// Only the contract module should be public for other modules to consume
pub mod contract;

// Re-export the public contract components
pub use contract::{client, error, model};

// === INTERNAL MODULES ===
// Exposed for the command-line front end and for comprehensive testing.
// Presentation code should go through `contract` and `gateways` where it can.
pub mod config;
pub mod domain;
pub mod gateways;
pub mod infra;

pub use config::DirectoryConfig;
pub use domain::engine::EmployeeEngine;

use std::sync::Arc;

use domain::{events::DirectoryEvent, ports::EventPublisher};
use infra::storage::{BlobSnapshotStore, BlobStore};

/// Wire an engine over `blobs` using the module configuration.
pub fn open_engine<R: rand::Rng>(
    config: &DirectoryConfig,
    blobs: Arc<dyn BlobStore>,
    events: Arc<dyn EventPublisher<DirectoryEvent>>,
    rng: &mut R,
) -> EmployeeEngine {
    let store = Arc::new(BlobSnapshotStore::new(blobs, config.storage_key.clone()));
    EmployeeEngine::open(store, events, config.into(), rng)
}
