use notepad_core::export::text::TEXT_EXPORT_FILE_NAME;
use notepad_core::{
    export_notes_as_text, write_text_export, ExportError, Note, NoteOrder, NoteStore,
};

#[test]
fn export_writes_listing_in_display_order() {
    let store = NoteStore::open_in_memory().unwrap();
    store.insert_or_replace(&Note::new("first", "one", 0)).unwrap();
    let mut pinned = Note::new("second", "two", 86_400_000);
    pinned.is_pinned = true;
    store.insert_or_replace(&pinned).unwrap();

    let notes = store.list(NoteOrder::PinnedFirst).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("exports");
    let path = write_text_export(&notes, &target).unwrap();

    assert_eq!(path, target.join(TEXT_EXPORT_FILE_NAME));
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, export_notes_as_text(&notes).unwrap());
    assert!(written.starts_with("Title: second\nDescription: two\nDate: Fri Jan 02 00:00:00 UTC 1970\n\n"));
    assert!(written.ends_with("Title: first\nDescription: one\nDate: Thu Jan 01 00:00:00 UTC 1970\n\n"));
}

#[test]
fn export_replaces_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    write_text_export(&[Note::new("old", "", 0)], dir.path()).unwrap();
    let path = write_text_export(&[], dir.path()).unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "");
}

#[test]
fn export_into_a_file_path_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();

    let err = write_text_export(&[Note::new("t", "", 0)], &blocker).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
}

#[test]
fn note_serializes_with_camel_case_fields() {
    let mut note = Note::new("t", "d", 5);
    note.id = 3;
    note.image_uri = Some("content://img".to_string());

    let value = serde_json::to_value(&note).unwrap();
    assert_eq!(value["colorHex"], serde_json::json!(notepad_core::DEFAULT_NOTE_COLOR));
    assert_eq!(value["createdAt"], serde_json::json!(5));
    assert_eq!(value["isPinned"], serde_json::json!(false));
    assert_eq!(value["imageUri"], serde_json::json!("content://img"));

    let back: Note = serde_json::from_value(value).unwrap();
    assert_eq!(back, note);
}
