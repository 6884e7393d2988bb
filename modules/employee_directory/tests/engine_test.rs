mod common;

use std::sync::Arc;

use common::*;
use employee_directory::domain::error::DomainError;
use employee_directory::domain::events::DirectoryEvent;
use employee_directory::domain::ports::NoopPublisher;
use employee_directory::infra::storage::MemoryBlobStore;
use employee_directory::model::{EmployeeId, EmployeePatch, Snapshot};
use employee_directory::{open_engine, DirectoryConfig};
use paging_core::SortDir;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn two_records() -> employee_directory::EmployeeEngine {
    let (mut engine, _) = empty_engine();
    let json = serde_json::to_string(&vec![employee(1, "Ann", "Eng"), employee(2, "Bob", "Sales")])
        .unwrap();
    assert!(engine.import_json(&json));
    engine
}

#[test]
fn department_filter_then_clear_restores_order() {
    let mut engine = two_records();

    engine.set_departments(["Eng"]);
    assert_eq!(ids(&engine.page().items), vec![1]);

    engine.clear_filters();
    assert_eq!(ids(&engine.page().items), vec![1, 2]);
}

#[test]
fn page_size_one_navigation() {
    let mut engine = two_records();
    engine.set_page_size(1);

    assert!(engine.go_to_page(2));
    let page = engine.page();
    assert_eq!(ids(&page.items), vec![2]);
    assert_eq!(page.page_info.total_pages, 2);
    assert!(page.page_info.has_prev);
    assert!(!page.page_info.has_next);

    assert!(!engine.go_to_page(3));
    assert_eq!(engine.current_page(), 2);
    assert!(!engine.next_page());
    assert!(engine.prev_page());
    assert_eq!(engine.current_page(), 1);
    assert!(!engine.go_to_page(0));
}

#[test]
fn ids_follow_add_order_without_reusing_deleted_lower_ids() {
    let (mut engine, _) = empty_engine();
    let x = new_employee("Xavier", "Young", "Eng", "Lead");

    assert_eq!(engine.add(x.clone()).unwrap().id, EmployeeId(1));
    assert_eq!(engine.add(x.clone()).unwrap().id, EmployeeId(2));
    engine.delete(EmployeeId(1)).unwrap();
    assert_eq!(engine.add(x).unwrap().id, EmployeeId(3));
}

#[test]
fn absent_id_is_a_no_op() {
    let mut engine = two_records();
    let before = engine.employees().to_vec();

    let patch = EmployeePatch {
        role: Some("VP".into()),
        ..Default::default()
    };
    assert_eq!(
        engine.update(EmployeeId(99), patch),
        Err(DomainError::employee_not_found(EmployeeId(99)))
    );
    assert!(engine.delete(EmployeeId(99)).unwrap_err().is_not_found());
    assert_eq!(engine.employees(), before.as_slice());
    assert!(engine.find_by_id(EmployeeId(99)).is_none());
}

#[test]
fn update_merges_and_stamps() {
    let mut engine = two_records();
    let updated = engine
        .update(
            EmployeeId(2),
            EmployeePatch {
                department: Some("Eng".into()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.department, "Eng");
    assert_eq!(updated.first_name, "Bob");
    assert!(updated.updated_at.is_some());
    assert_eq!(engine.find_by_id(EmployeeId(2)), Some(&updated));
    assert_eq!(engine.unique_departments(), vec!["Eng".to_string()]);
}

#[test]
fn page_is_clamped_after_delete_empties_it() {
    let mut engine = two_records();
    engine.set_page_size(1);
    assert!(engine.go_to_page(2));

    engine.delete(EmployeeId(2)).unwrap();
    assert_eq!(engine.current_page(), 1);
    assert_eq!(ids(&engine.page().items), vec![1]);

    engine.delete(EmployeeId(1)).unwrap();
    let page = engine.page();
    assert_eq!(engine.current_page(), 1);
    assert_eq!(page.page_info.total_pages, 1);
    assert_eq!(page.page_info.total_items, 0);
    assert_eq!(page.page_info.start_item, 0);
    assert!(page.items.is_empty());
    assert!(engine.go_to_page(1));
}

#[test]
fn view_changes_reset_page() {
    let mut engine = two_records();
    engine.set_page_size(1);
    assert!(engine.go_to_page(2));

    engine.set_sort("firstName", SortDir::Desc);
    assert_eq!(engine.current_page(), 1);
    assert_eq!(engine.sort_key(), Some("firstName"));
    assert_eq!(engine.sort_direction(), SortDir::Desc);
    assert_eq!(ids(engine.view()), vec![2, 1]);

    engine.set_sort("", SortDir::Desc);
    assert_eq!(engine.sort_key(), None);
    assert_eq!(ids(engine.view()), vec![1, 2]);
}

#[test]
fn search_narrows_totals() {
    let mut engine = two_records();
    engine.set_search("  BOB@corp ");
    assert_eq!(engine.total_filtered(), 1);
    assert_eq!(engine.total_employees(), 2);
    assert_eq!(engine.filters().search(), "bob@corp");
}

#[test]
fn unique_lists_come_from_canonical_collection() {
    let mut engine = two_records();
    engine.set_departments(["Sales"]);
    assert_eq!(
        engine.unique_departments(),
        vec!["Eng".to_string(), "Sales".to_string()]
    );
    assert_eq!(engine.unique_roles(), vec!["Lead".to_string()]);
}

#[test]
fn export_import_round_trip() {
    let mut engine = two_records();
    engine
        .update(
            EmployeeId(1),
            EmployeePatch {
                last_name: Some("Smith".into()),
                ..Default::default()
            },
        )
        .unwrap();
    let exported = engine.export_json().unwrap();
    assert!(exported.starts_with("[\n"));

    let (mut other, _) = empty_engine();
    assert_eq!(other.try_import_json(&exported), Ok(2));
    assert_eq!(other.employees(), engine.employees());
}

#[test]
fn import_rejects_non_arrays_and_keeps_state() {
    let mut engine = two_records();
    let before = engine.employees().to_vec();

    assert!(!engine.import_json(r#"{"employees": []}"#));
    assert!(!engine.import_json("not json"));
    assert!(!engine.import_json(r#"[{"id": 1}]"#));
    assert!(matches!(
        engine.try_import_json("42"),
        Err(DomainError::MalformedInput { .. })
    ));

    let zero_ids = serde_json::to_string(&vec![employee(0, "Zed", "Eng"), employee(0, "Zoe", "Eng")])
        .unwrap();
    assert!(!engine.import_json(&zero_ids));
    let repeated = serde_json::to_string(&vec![employee(7, "Ann", "Eng"), employee(7, "Bob", "Eng")])
        .unwrap();
    assert!(matches!(
        engine.try_import_json(&repeated),
        Err(DomainError::MalformedInput { ref message }) if message.contains("duplicate")
    ));
    assert_eq!(engine.employees(), before.as_slice());

    assert!(engine.import_json("[]"));
    assert_eq!(engine.total_employees(), 0);
}

#[test]
fn mutations_persist_a_snapshot() {
    let (mut engine, blobs) = empty_engine();
    engine
        .add(new_employee("Ann", "Lee", "Eng", "Lead"))
        .unwrap();

    let raw = blobs.raw(KEY).expect("snapshot written");
    let snapshot: Snapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot.employees, engine.employees());
    assert!(raw.contains("\"lastUpdated\""));
}

#[test]
fn reopening_loads_the_persisted_collection() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let cfg = DirectoryConfig::default();

    let first = open_engine(&cfg, blobs.clone(), Arc::new(NoopPublisher), &mut rng());
    assert_eq!(first.total_employees(), 25);
    let seeded = first.employees().to_vec();

    // A different seed would produce different departments if it reseeded.
    let second = open_engine(
        &cfg,
        blobs,
        Arc::new(NoopPublisher),
        &mut StdRng::seed_from_u64(999),
    );
    assert_eq!(second.employees(), seeded.as_slice());
}

#[test]
fn persisted_empty_collection_is_not_reseeded() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let cfg = DirectoryConfig::default();

    let mut engine = open_engine(&cfg, blobs.clone(), Arc::new(NoopPublisher), &mut rng());
    engine.clear_all();

    let reopened = open_engine(&cfg, blobs, Arc::new(NoopPublisher), &mut rng());
    assert_eq!(reopened.total_employees(), 0);
}

#[test]
fn corrupt_snapshot_falls_back_to_seed() {
    let blobs = Arc::new(MemoryBlobStore::new());
    blobs.put_raw(KEY, "{\"employees\": 12");

    let engine = open_engine(
        &DirectoryConfig::default(),
        blobs.clone(),
        Arc::new(NoopPublisher),
        &mut rng(),
    );
    assert_eq!(engine.total_employees(), 25);
    assert!(serde_json::from_str::<Snapshot>(&blobs.raw(KEY).unwrap()).is_ok());
}

#[test]
fn unavailable_storage_keeps_working_in_memory() {
    let (mut engine, blobs, events) = recording_engine();
    blobs.set_available(false);

    let added = engine.add(new_employee("Ann", "Lee", "Eng", "Lead")).unwrap();
    assert!(!engine.last_save_ok());
    assert_eq!(engine.find_by_id(added.id), Some(&added));
    assert_eq!(engine.page().items.len(), 1);

    let recorded = events.events();
    assert!(matches!(recorded.last(), Some(DirectoryEvent::Created { id, .. }) if *id == added.id));
    assert!(recorded
        .iter()
        .any(|e| matches!(e, DirectoryEvent::SaveFailed { .. })));
}

#[test]
fn lifecycle_events_are_published() {
    let (mut engine, _, events) = recording_engine();
    let a = engine.add(new_employee("Ann", "Lee", "Eng", "Lead")).unwrap();
    engine
        .update(
            a.id,
            EmployeePatch {
                role: Some("VP".into()),
                ..Default::default()
            },
        )
        .unwrap();
    engine.delete(a.id).unwrap();
    engine.import_json("[]");
    engine.reset_to_sample_data(&mut rng());
    engine.clear_all();

    let kinds: Vec<&'static str> = events
        .events()
        .iter()
        .map(|e| match e {
            DirectoryEvent::Created { .. } => "created",
            DirectoryEvent::Updated { .. } => "updated",
            DirectoryEvent::Deleted { .. } => "deleted",
            DirectoryEvent::Imported { .. } => "imported",
            DirectoryEvent::Cleared { .. } => "cleared",
            DirectoryEvent::Reset { .. } => "reset",
            DirectoryEvent::SaveFailed { .. } => "save_failed",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["created", "updated", "deleted", "imported", "reset", "cleared"]
    );
}

#[test]
fn reset_replaces_with_sample_data() {
    let mut engine = two_records();
    engine.reset_to_sample_data(&mut rng());
    assert_eq!(engine.total_employees(), 25);
    assert_eq!(engine.employees()[0].email, "john.smith@company.com");
}

#[test]
fn add_past_the_largest_id_fails_without_panicking() {
    let (mut engine, _) = empty_engine();
    let json = serde_json::to_string(&vec![employee(u64::MAX, "Max", "Eng")]).unwrap();
    assert!(engine.import_json(&json));

    let err = engine
        .add(new_employee("Ann", "Lee", "Eng", "Lead"))
        .unwrap_err();
    assert_eq!(err, DomainError::ids_exhausted(EmployeeId(u64::MAX)));
    assert_eq!(ids(engine.employees()), vec![u64::MAX]);

    engine.delete(EmployeeId(u64::MAX)).unwrap();
    assert_eq!(
        engine.add(new_employee("Ann", "Lee", "Eng", "Lead")).unwrap().id,
        EmployeeId(1)
    );
}

#[test]
fn snapshot_with_duplicate_ids_is_ignored() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let snapshot = Snapshot {
        employees: vec![employee(3, "Ann", "Eng"), employee(3, "Bob", "Sales")],
        last_updated: employee(1, "X", "Y").created_at,
    };
    blobs.put_raw(KEY, &serde_json::to_string(&snapshot).unwrap());

    let engine = open_engine(
        &DirectoryConfig::default(),
        blobs.clone(),
        Arc::new(NoopPublisher),
        &mut rng(),
    );
    assert_eq!(engine.total_employees(), 25);
    let stored: Snapshot = serde_json::from_str(&blobs.raw(KEY).unwrap()).unwrap();
    assert_eq!(stored.employees, engine.employees());
}
