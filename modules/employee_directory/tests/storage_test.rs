mod common;

use std::fs;
use std::sync::Arc;

use common::*;
use employee_directory::domain::ports::NoopPublisher;
use employee_directory::domain::repo::SnapshotRepository;
use employee_directory::infra::storage::{BlobSnapshotStore, BlobStore, FileBlobStore};
use employee_directory::model::Snapshot;
use employee_directory::open_engine;
use tempfile::tempdir;

#[test]
fn engine_state_survives_a_restart_on_disk() {
    let tmp = tempdir().unwrap();
    let blobs = Arc::new(FileBlobStore::new(tmp.path().join("data")));

    let mut engine = open_engine(&config(), blobs.clone(), Arc::new(NoopPublisher), &mut rng());
    engine.add(new_employee("Ann", "Lee", "Eng", "Lead")).unwrap();
    engine.add(new_employee("Bob", "Ray", "Sales", "VP")).unwrap();
    drop(engine);

    let file = blobs.path_for(KEY);
    assert!(file.is_file());

    let reopened = open_engine(&config(), blobs, Arc::new(NoopPublisher), &mut rng());
    assert_eq!(ids(reopened.employees()), vec![1, 2]);
    assert_eq!(reopened.employees()[1].department, "Sales");
}

#[test]
fn snapshot_file_uses_the_wire_format() {
    let tmp = tempdir().unwrap();
    let blobs = Arc::new(FileBlobStore::new(tmp.path()));
    let mut engine = open_engine(&config(), blobs.clone(), Arc::new(NoopPublisher), &mut rng());
    engine.add(new_employee("Ann", "Lee", "Eng", "Lead")).unwrap();

    let raw = fs::read_to_string(blobs.path_for(KEY)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &value["employees"][0];

    assert_eq!(record["id"], 1);
    assert_eq!(record["firstName"], "Ann");
    assert_eq!(record["email"], "ann.lee@corp.com");
    assert!(record.get("updatedAt").is_none());
    assert!(record["createdAt"].as_str().unwrap().ends_with('Z'));
    assert!(value["lastUpdated"].is_string());
}

#[test]
fn corrupt_file_loads_as_absent() {
    let tmp = tempdir().unwrap();
    let blobs = Arc::new(FileBlobStore::new(tmp.path()));
    fs::write(blobs.path_for(KEY), "[[[").unwrap();

    let store = BlobSnapshotStore::new(blobs, KEY);
    assert_eq!(store.load(), None);
}

#[test]
fn unwritable_directory_reports_failure() {
    let tmp = tempdir().unwrap();
    // A regular file where the data directory should be.
    let blocker = tmp.path().join("data");
    fs::write(&blocker, "x").unwrap();

    let blobs: Arc<dyn BlobStore> = Arc::new(FileBlobStore::new(&blocker));
    let store = BlobSnapshotStore::new(blobs, KEY);

    assert!(!store.is_available());
    let snapshot = Snapshot {
        employees: vec![employee(1, "Ann", "Eng")],
        last_updated: chrono::Utc::now(),
    };
    assert!(!store.save(&snapshot));
}

#[test]
fn clear_deletes_the_file() {
    let tmp = tempdir().unwrap();
    let blobs = Arc::new(FileBlobStore::new(tmp.path()));
    let store = BlobSnapshotStore::new(blobs.clone(), KEY);
    let snapshot = Snapshot {
        employees: vec![],
        last_updated: chrono::Utc::now(),
    };

    assert!(store.save(&snapshot));
    assert!(blobs.path_for(KEY).exists());
    assert!(store.clear());
    assert!(!blobs.path_for(KEY).exists());
    assert!(store.clear());
}
