//! Core note storage for the notepad app.
//! This crate owns the note record lifecycle: creation, merge-preserving
//! edits, pinning, deletion, ordered live listings and search.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use export::text::{
    created_label, export_notes_as_text, share_text, write_text_export, ExportError,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{
    Note, NoteId, NoteValidationError, DEFAULT_NOTE_COLOR, NOTE_COLOR_PALETTE, UNASSIGNED_NOTE_ID,
};
pub use repo::note_repo::{
    NoteOrder, NoteRepository, RepoError, RepoResult, SqliteNoteRepository,
};
pub use search::filter::{filter_notes, matches_query};
pub use service::note_service::{Clock, NoteService, NoteServiceError, UpsertRequest};
pub use store::{LiveNotes, NoteStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
