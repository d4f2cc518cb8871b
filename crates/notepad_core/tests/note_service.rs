use notepad_core::{
    Clock, NoteOrder, NoteService, NoteServiceError, NoteStore, UpsertRequest, DEFAULT_NOTE_COLOR,
};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

struct Fixture {
    service: NoteService,
    now: Arc<AtomicI64>,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(NoteStore::open_in_memory().unwrap());
        let now = Arc::new(AtomicI64::new(1_000));
        let ticks = Arc::clone(&now);
        let clock: Clock = Arc::new(move || ticks.load(Ordering::SeqCst));
        Self {
            service: NoteService::with_clock(store, clock),
            now,
        }
    }

    fn advance_to(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

#[test]
fn create_edit_delete_scenario() {
    let fx = Fixture::new();
    fx.advance_to(1_111);

    let created = fx
        .service
        .upsert(&UpsertRequest::create("Groceries", "Milk, eggs"))
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.created_at, 1_111);
    assert_eq!(created.color_hex, DEFAULT_NOTE_COLOR);
    assert!(!created.is_pinned);
    assert!(created.image_uri.is_none());

    fx.advance_to(9_999);
    let edited = fx
        .service
        .upsert(&UpsertRequest::edit(1, "Groceries", "Milk, eggs, bread"))
        .unwrap();
    assert_eq!(edited.id, 1);
    assert_eq!(edited.created_at, 1_111);
    assert!(!edited.is_pinned);
    assert_eq!(edited.description, "Milk, eggs, bread");
    assert_eq!(fx.service.get_note(1).unwrap(), edited);

    fx.service.delete(1).unwrap();
    let err = fx.service.get_note(1).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(1)));
}

#[test]
fn edit_overwrites_text_but_preserves_unsupplied_fields() {
    let fx = Fixture::new();
    let created = fx
        .service
        .upsert(
            &UpsertRequest::create("Old", "keep me?")
                .with_color(0xFFC8_E6C9)
                .with_image_uri("content://media/1"),
        )
        .unwrap();
    let pinned = fx.service.toggle_pin(created.id).unwrap();
    assert!(pinned.is_pinned);

    fx.advance_to(50_000);
    let edited = fx
        .service
        .upsert(&UpsertRequest::edit(created.id, "New", ""))
        .unwrap();

    assert_eq!(edited.title, "New");
    assert_eq!(edited.description, "");
    assert_eq!(edited.color_hex, 0xFFC8_E6C9);
    assert_eq!(edited.created_at, created.created_at);
    assert!(edited.is_pinned);
    assert_eq!(edited.image_uri.as_deref(), Some("content://media/1"));
}

#[test]
fn edit_applies_explicit_overrides() {
    let fx = Fixture::new();
    let created = fx
        .service
        .upsert(&UpsertRequest::create("Title", "Body"))
        .unwrap();

    let edited = fx
        .service
        .upsert(
            &UpsertRequest::edit(created.id, "Title", "Body")
                .with_color(0xFFFF_F9C4)
                .with_created_at(42)
                .with_image_uri("content://media/2"),
        )
        .unwrap();
    assert_eq!(edited.color_hex, 0xFFFF_F9C4);
    assert_eq!(edited.created_at, 42);
    assert_eq!(edited.image_uri.as_deref(), Some("content://media/2"));
}

#[test]
fn edit_of_deleted_note_creates_a_new_one_with_fresh_id() {
    let fx = Fixture::new();
    let first = fx.service.upsert(&UpsertRequest::create("a", "")).unwrap();
    let second = fx.service.upsert(&UpsertRequest::create("b", "")).unwrap();
    fx.service.delete(second.id).unwrap();

    fx.advance_to(7_777);
    let recreated = fx
        .service
        .upsert(&UpsertRequest::edit(second.id, "b again", "").with_created_at(1))
        .unwrap();

    assert_ne!(recreated.id, second.id);
    assert_ne!(recreated.id, first.id);
    assert_eq!(recreated.created_at, 7_777);
    assert!(!recreated.is_pinned);
    assert!(fx.service.get_note(second.id).is_err());
    assert_eq!(fx.service.list_notes(NoteOrder::PinnedFirst).unwrap().len(), 2);
}

#[test]
fn upsert_with_unassigned_id_creates() {
    let fx = Fixture::new();
    let created = fx
        .service
        .upsert(&UpsertRequest::edit(0, "zero", ""))
        .unwrap();
    assert_eq!(created.id, 1);
}

#[test]
fn blank_upsert_is_rejected_without_writing() {
    let fx = Fixture::new();
    let err = fx
        .service
        .upsert(&UpsertRequest::create(" ", ""))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::InvalidInput(_)));
    assert!(!err.is_storage_failure());

    let err = fx
        .service
        .upsert(&UpsertRequest::edit(-4, "t", "d"))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::InvalidInput(_)));
    assert!(fx.service.list_notes(NoteOrder::ByDate).unwrap().is_empty());
}

#[test]
fn blank_image_and_pre_epoch_override_are_stored_as_given() {
    let fx = Fixture::new();
    let created = fx
        .service
        .upsert(&UpsertRequest::create("t", "").with_image_uri(""))
        .unwrap();
    assert_eq!(created.image_uri.as_deref(), Some(""));

    let edited = fx
        .service
        .upsert(&UpsertRequest::edit(created.id, "t", "d").with_created_at(-5))
        .unwrap();
    assert_eq!(edited.created_at, -5);
    assert_eq!(edited.image_uri.as_deref(), Some(""));
    assert_eq!(fx.service.get_note(created.id).unwrap(), edited);
}

#[test]
fn double_toggle_restores_original_note() {
    let fx = Fixture::new();
    let created = fx
        .service
        .upsert(&UpsertRequest::create("pin", "me").with_image_uri("content://x"))
        .unwrap();

    let once = fx.service.toggle_pin(created.id).unwrap();
    assert!(once.is_pinned);
    assert_eq!(once.title, created.title);
    assert_eq!(once.created_at, created.created_at);

    let twice = fx.service.toggle_pin(created.id).unwrap();
    assert_eq!(twice, created);
    assert_eq!(fx.service.get_note(created.id).unwrap(), created);
}

#[test]
fn toggle_pin_of_missing_note_reports_not_found() {
    let fx = Fixture::new();
    let err = fx.service.toggle_pin(404).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(404)));
    assert!(fx.service.list_notes(NoteOrder::PinnedFirst).unwrap().is_empty());
}

#[test]
fn delete_of_missing_note_succeeds() {
    let fx = Fixture::new();
    fx.service.delete(77).unwrap();
}

#[test]
fn search_filters_without_reordering() {
    let fx = Fixture::new();
    fx.advance_to(3);
    let cats = fx.service.upsert(&UpsertRequest::create("Cats", "")).unwrap();
    fx.advance_to(2);
    let dogs = fx
        .service
        .upsert(&UpsertRequest::create("Dogs", "cat food"))
        .unwrap();
    fx.advance_to(1);
    fx.service
        .upsert(&UpsertRequest::create("Birds", "seeds"))
        .unwrap();

    let by_date: Vec<_> = fx
        .service
        .search(NoteOrder::ByDate, "cat")
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(by_date, vec![cats.id, dogs.id]);

    let pinned_first: Vec<_> = fx
        .service
        .search(NoteOrder::PinnedFirst, "CAT")
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(pinned_first, vec![dogs.id, cats.id]);

    assert_eq!(fx.service.search(NoteOrder::ByDate, "").unwrap().len(), 3);
}

#[test]
fn concurrent_edits_on_one_note_all_apply() {
    let fx = Fixture::new();
    let created = fx.service.upsert(&UpsertRequest::create("n", "0")).unwrap();
    let service = Arc::new(fx.service);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                for step in 0..10 {
                    service
                        .upsert(&UpsertRequest::edit(
                            created.id,
                            "n",
                            format!("{worker}-{step}"),
                        ))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let notes = service.list_notes(NoteOrder::PinnedFirst).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, created.id);
    assert!(notes[0].description.ends_with("-9"));
}
