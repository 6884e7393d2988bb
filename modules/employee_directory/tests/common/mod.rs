#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use employee_directory::domain::events::DirectoryEvent;
use employee_directory::domain::ports::{NoopPublisher, RecordingPublisher};
use employee_directory::infra::storage::MemoryBlobStore;
use employee_directory::model::{Employee, EmployeeId, NewEmployee};
use employee_directory::{open_engine, DirectoryConfig, EmployeeEngine};

pub const KEY: &str = "employee_directory_data";

pub fn config() -> DirectoryConfig {
    DirectoryConfig {
        seed_sample_data: false,
        ..DirectoryConfig::default()
    }
}

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Empty engine over a memory store.
pub fn empty_engine() -> (EmployeeEngine, Arc<MemoryBlobStore>) {
    let blobs = Arc::new(MemoryBlobStore::new());
    let engine = open_engine(&config(), blobs.clone(), Arc::new(NoopPublisher), &mut rng());
    (engine, blobs)
}

pub fn recording_engine() -> (
    EmployeeEngine,
    Arc<MemoryBlobStore>,
    Arc<RecordingPublisher<DirectoryEvent>>,
) {
    let blobs = Arc::new(MemoryBlobStore::new());
    let events = Arc::new(RecordingPublisher::<DirectoryEvent>::new());
    let engine = open_engine(&config(), blobs.clone(), events.clone(), &mut rng());
    (engine, blobs, events)
}

pub fn new_employee(first: &str, last: &str, dept: &str, role: &str) -> NewEmployee {
    NewEmployee {
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}.{}@corp.com", first.to_lowercase(), last.to_lowercase()),
        department: dept.into(),
        role: role.into(),
    }
}

pub fn employee(id: u64, first: &str, dept: &str) -> Employee {
    Employee {
        id: EmployeeId(id),
        first_name: first.into(),
        last_name: "Doe".into(),
        email: format!("{}@corp.com", first.to_lowercase()),
        department: dept.into(),
        role: "Lead".into(),
        created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        updated_at: None,
    }
}

pub fn ids(v: &[Employee]) -> Vec<u64> {
    v.iter().map(|e| e.id.get()).collect()
}
