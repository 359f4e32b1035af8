use std::fs;
use std::sync::Arc;

use serde_json::json;
use tablado_core::MemoryDiagnostics;
use tablado_state::{DeferredStatus, StateStore, TrackingCollection, TrackingEntry};
use tempfile::TempDir;

fn collection(tmp: &TempDir, name: &str) -> (TrackingCollection, Arc<MemoryDiagnostics>) {
    let diag = Arc::new(MemoryDiagnostics::new());
    (TrackingCollection::new(tmp.path().join(name), diag.clone()), diag)
}

fn entry(id: &str) -> TrackingEntry {
    TrackingEntry::new(id, format!("Title {id}"), format!("https://example.test/{id}"), "test")
}

#[test]
fn append_then_read() {
    let tmp = TempDir::new().unwrap();
    let (c, _) = collection(&tmp, "ignored.json");
    let e = entry("a1").with_detail("winner_id", "w9");
    c.append(e.clone()).unwrap();
    let read = c.read();
    assert_eq!(read, vec![e]);
}

#[test]
fn remove_by_id_retracts() {
    let tmp = TempDir::new().unwrap();
    let (c, _) = collection(&tmp, "failed.json");
    c.append(entry("a1")).unwrap();
    c.append(entry("b2")).unwrap();
    c.append(entry("a1")).unwrap();

    assert_eq!(c.remove_by_id("a1").unwrap(), 2);
    let ids: Vec<_> = c.read().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["b2"]);
    assert_eq!(c.remove_by_id("zz").unwrap(), 0);
}

#[test]
fn append_keeps_duplicates() {
    let tmp = TempDir::new().unwrap();
    let (c, _) = collection(&tmp, "failed.json");
    c.append(entry("a1")).unwrap();
    c.append(entry("a1")).unwrap();
    assert_eq!(c.read().len(), 2);
    assert_eq!(c.id_set().len(), 1);
    assert!(c.contains("a1"));
}

#[test]
fn missing_file_reads_empty() {
    let tmp = TempDir::new().unwrap();
    let (c, diag) = collection(&tmp, "nothing.json");
    assert!(c.read().is_empty());
    assert!(diag.records().is_empty());
}

#[test]
fn invalid_json_reads_empty_and_reports() {
    let tmp = TempDir::new().unwrap();
    let (c, diag) = collection(&tmp, "ignored.json");
    fs::write(c.path(), "[{\"id\": \"a1\",").unwrap();
    assert!(c.read().is_empty());
    assert!(diag.contains("corrupt"));
}

#[test]
fn non_array_reads_empty() {
    let tmp = TempDir::new().unwrap();
    let (c, diag) = collection(&tmp, "ignored.json");
    fs::write(c.path(), r#"{"id": "a1"}"#).unwrap();
    assert!(c.read().is_empty());
    assert!(diag.contains("not a JSON array"));

    fs::write(c.path(), "   \n").unwrap();
    assert!(c.read().is_empty());
}

#[test]
fn corrupt_file_heals_on_append() {
    let tmp = TempDir::new().unwrap();
    let (c, _) = collection(&tmp, "ignored.json");
    fs::write(c.path(), "not json").unwrap();
    c.append(entry("a1")).unwrap();
    assert_eq!(c.read().len(), 1);
}

#[test]
fn unreadable_items_survive_rewrites() {
    let tmp = TempDir::new().unwrap();
    let (c, diag) = collection(&tmp, "ignored.json");
    fs::write(c.path(), r#"[{"id":"a1","reason":"x"}, "stray", {"id": 7, "extra": [1,2]}]"#).unwrap();
    let entries = c.read();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].id, "7");
    assert_eq!(entries[1].detail("extra"), Some(&json!([1, 2])));
    assert!(diag.contains("unreadable"));

    c.append(entry("b2")).unwrap();
    c.remove_by_id("a1").unwrap();
    let on_disk: serde_json::Value = serde_json::from_str(&fs::read_to_string(c.path()).unwrap()).unwrap();
    let items = on_disk.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.contains(&json!("stray")));
    assert_eq!(c.read().len(), 2);
}

#[test]
fn hand_typed_acceptance_survives_other_writes() {
    let tmp = TempDir::new().unwrap();
    let store = StateStore::open(tmp.path(), Arc::new(MemoryDiagnostics::new()));
    fs::write(
        store.paths.deferred(),
        r#"[
            {"id":"v1","title":"t1","url":"u1","reason":"short","accepted":"yes"},
            {"id":"v2","title":"t2","url":"u2","reason":"short","accepted":false},
            {"id":"v4","title":"t4","url":"u4","reason":"short","accepted":"later","note":"ask"}
        ]"#,
    )
    .unwrap();
    assert_eq!(store.deferred.status("v1"), DeferredStatus::Accepted);
    assert_eq!(store.deferred.status("v4"), DeferredStatus::Pending);

    assert!(store.deferred.defer(entry("v3")).unwrap());

    let entries = store.deferred.entries();
    let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["v1", "v2", "v4", "v3"]);
    assert_eq!(entries[0].accepted, Some(true));
    assert_eq!(entries[1].accepted, Some(false));
    // Unreadable marker and extra fields are kept as typed
    assert_eq!(entries[2].accepted, None);
    assert_eq!(entries[2].detail("accepted"), Some(&json!("later")));
    assert_eq!(entries[2].detail("note"), Some(&json!("ask")));

    store.deferred.accept(&["v4".to_string()]).unwrap();
    assert_eq!(store.deferred.status("v4"), DeferredStatus::Accepted);
    let raw = fs::read_to_string(store.paths.deferred()).unwrap();
    assert!(!raw.contains("later"));
}

#[test]
fn write_value_refuses_non_arrays() {
    let tmp = TempDir::new().unwrap();
    let (c, diag) = collection(&tmp, "ignored.json");
    c.append(entry("a1")).unwrap();

    c.write_value(&json!({"id": "x"})).unwrap();
    assert_eq!(c.read().len(), 1);
    assert!(diag.contains("Refusing"));

    c.write_value(&json!([{"id": "x", "reason": "manual"}])).unwrap();
    assert_eq!(c.read()[0].id, "x");
}

#[test]
fn write_leaves_no_temp_file() {
    let tmp = TempDir::new().unwrap();
    let (c, _) = collection(&tmp, "ignored.json");
    c.write(&[entry("a1")]).unwrap();
    let names: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["ignored.json"]);
}

#[test]
fn deferred_lifecycle() {
    let tmp = TempDir::new().unwrap();
    let store = StateStore::open(tmp.path(), Arc::new(MemoryDiagnostics::new()));
    let queue = &store.deferred;

    assert_eq!(queue.status("v1"), DeferredStatus::NotDeferred);
    assert!(queue.defer(entry("v1")).unwrap());
    assert!(!queue.defer(entry("v1")).unwrap());
    assert_eq!(queue.entries().len(), 1);
    assert_eq!(queue.entries()[0].accepted, Some(false));
    assert_eq!(queue.status("v1"), DeferredStatus::Pending);

    // Pending entries are never resolved away
    assert!(!queue.resolve("v1").unwrap());
    assert_eq!(queue.entries().len(), 1);

    let found = queue.accept(&["v1".to_string(), "missing".to_string()]).unwrap();
    assert_eq!(found, vec!["v1"]);
    assert_eq!(queue.status("v1"), DeferredStatus::Accepted);

    assert!(queue.resolve("v1").unwrap());
    assert_eq!(queue.status("v1"), DeferredStatus::NotDeferred);
}

#[test]
fn hand_edited_acceptance_is_honoured() {
    let tmp = TempDir::new().unwrap();
    let store = StateStore::open(tmp.path(), Arc::new(MemoryDiagnostics::new()));
    fs::write(
        store.paths.deferred(),
        r#"[{"id":"v1","title":"t","url":"u","reason":"short","accepted":true,"duration":120}]"#,
    )
    .unwrap();
    assert_eq!(store.deferred.status("v1"), DeferredStatus::Accepted);
}

#[test]
fn archive_from_store() {
    let tmp = TempDir::new().unwrap();
    let store = StateStore::open(tmp.path(), Arc::new(MemoryDiagnostics::new()));
    assert!(store.archive().unwrap().is_empty());
    fs::write(store.paths.archive(), "youtube abc\nyoutube def\n").unwrap();
    let archive = store.archive().unwrap();
    assert!(archive.contains("abc"));
    assert!(archive.contains("def"));
}
