use super::*;

// =============================================================
// MemoryStorage
// =============================================================

#[test]
fn memory_set_get_remove() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get("token"), None);

    storage.set("token", "abc").unwrap();
    assert_eq!(storage.get("token").as_deref(), Some("abc"));

    storage.remove("token").unwrap();
    assert_eq!(storage.get("token"), None);
    assert!(storage.is_empty());
}

#[test]
fn memory_remove_missing_key_is_ok() {
    let storage = MemoryStorage::new();
    assert!(storage.remove("nope").is_ok());
}

#[test]
fn memory_with_entries_seeds_values() {
    let storage = MemoryStorage::with_entries([("token", "t"), ("pwdreq", "true")]);
    assert_eq!(storage.len(), 2);
    assert_eq!(storage.get("pwdreq").as_deref(), Some("true"));
}

#[test]
fn memory_rejected_writes_leave_entries_untouched() {
    let storage = MemoryStorage::with_entries([("token", "t")]);
    storage.reject_writes(true);

    assert!(matches!(storage.set("token", "u"), Err(StorageError::Write(_))));
    assert!(storage.remove("token").is_err());
    assert_eq!(storage.get("token").as_deref(), Some("t"));

    storage.reject_writes(false);
    storage.set("token", "u").unwrap();
    assert_eq!(storage.get("token").as_deref(), Some("u"));
}

// =============================================================
// FileStorage
// =============================================================

#[test]
fn file_missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path().join("session.json")).unwrap();
    assert_eq!(storage.get("token"), None);
}

#[test]
fn file_writes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let storage = FileStorage::open(&path).unwrap();
    storage.set("token", "abc").unwrap();
    storage.set("pwdreq", "false").unwrap();
    drop(storage);

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.get("token").as_deref(), Some("abc"));
    assert_eq!(reopened.get("pwdreq").as_deref(), Some("false"));
}

#[test]
fn file_remove_is_written_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let storage = FileStorage::open(&path).unwrap();
    storage.set("token", "abc").unwrap();
    storage.remove("token").unwrap();

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.get("token"), None);
}

#[test]
fn file_corrupt_contents_open_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let storage = FileStorage::open(&path).unwrap();
    assert_eq!(storage.get("token"), None);

    storage.set("token", "fresh").unwrap();
    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.get("token").as_deref(), Some("fresh"));
}
