//! Note use-case service.
//!
//! # Responsibility
//! - Create and edit notes with merge-preserving upsert semantics.
//! - Toggle pin state, delete, list, search and subscribe.
//!
//! # Invariants
//! - Edits always overwrite `title` and `description`, even when blank.
//! - Edits keep stored `color_hex`, `created_at` and `image_uri` unless the
//!   request overrides them, and never change `is_pinned`.
//! - Editing an id that is no longer stored creates a new note with a fresh
//!   id; the requested id is not resurrected.
//! - Pin toggling changes nothing but `is_pinned`.

use crate::model::note::{Note, NoteId, NoteValidationError, DEFAULT_NOTE_COLOR, UNASSIGNED_NOTE_ID};
use crate::repo::note_repo::{NoteOrder, RepoError};
use crate::search::filter::filter_notes;
use crate::store::{LiveNotes, NoteStore};
use chrono::Utc;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Source of "now" in epoch milliseconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Request rejected before reaching storage.
    InvalidInput(&'static str),
    /// Resulting record failed validation.
    InvalidNote(NoteValidationError),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl NoteServiceError {
    /// Returns whether the underlying storage failed (I/O, corruption).
    pub fn is_storage_failure(&self) -> bool {
        match self {
            Self::Repo(err) => err.is_storage_failure(),
            _ => false,
        }
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(details) => write!(f, "invalid input: {details}"),
            Self::InvalidNote(err) => write!(f, "invalid note: {err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNote(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            RepoError::Validation(err) => Self::InvalidNote(err),
            other => Self::Repo(other),
        }
    }
}

/// Create-or-edit request as produced by the note editor.
///
/// `None` fields mean "not supplied": defaults on creation, stored values on edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertRequest {
    /// Target note; `None` creates a new one.
    pub id: Option<NoteId>,
    pub title: String,
    pub description: String,
    /// ARGB color.
    pub color: Option<i64>,
    /// Replacement creation time, honored on edit only.
    pub created_at_override: Option<i64>,
    pub image_uri_override: Option<String>,
}

impl UpsertRequest {
    /// Request for a brand-new note.
    pub fn create(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Request editing note `id`.
    pub fn edit(id: NoteId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            ..Self::create(title, description)
        }
    }

    pub fn with_color(mut self, color: i64) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at_override = Some(created_at);
        self
    }

    pub fn with_image_uri(mut self, image_uri: impl Into<String>) -> Self {
        self.image_uri_override = Some(image_uri.into());
        self
    }

    fn validate(&self) -> Result<(), NoteServiceError> {
        if self.title.trim().is_empty() && self.description.trim().is_empty() {
            return Err(NoteServiceError::InvalidInput(
                "title and description must not both be blank",
            ));
        }
        if matches!(self.id, Some(id) if id < 0) {
            return Err(NoteServiceError::InvalidInput("note id must not be negative"));
        }
        Ok(())
    }
}

/// Note service facade over a shared store.
pub struct NoteService {
    store: Arc<NoteStore>,
    clock: Clock,
}

impl NoteService {
    /// Creates a service that stamps new notes with the system clock.
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self::with_clock(store, Arc::new(|| Utc::now().timestamp_millis()))
    }

    /// Creates a service with a caller-provided clock.
    pub fn with_clock(store: Arc<NoteStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Shared store behind this service.
    pub fn store(&self) -> &Arc<NoteStore> {
        &self.store
    }

    /// Creates or edits a note and returns the persisted record.
    ///
    /// # Errors
    /// - `InvalidInput` when title and description are both blank.
    /// - `InvalidNote` when the merged record fails validation.
    /// - `Repo` when storage fails.
    pub fn upsert(&self, request: &UpsertRequest) -> Result<Note, NoteServiceError> {
        request.validate()?;

        let target = request.id.filter(|id| *id != UNASSIGNED_NOTE_ID);
        let Some(id) = target else {
            let stored = self.store.insert_or_replace(&self.fresh_note(request))?;
            info!(
                "event=note_upsert module=service status=ok mode=create note_id={}",
                stored.id
            );
            return Ok(stored);
        };

        let mut recreated = false;
        let stored = self
            .store
            .modify(id, |existing| match existing {
                Some(existing) => Some(merge_edit(existing, request)),
                None => {
                    recreated = true;
                    Some(self.fresh_note(request))
                }
            })?
            .ok_or(NoteServiceError::NoteNotFound(id))?;

        if recreated {
            warn!(
                "event=note_upsert module=service status=ok mode=recreate requested_id={} note_id={}",
                id, stored.id
            );
        } else {
            info!(
                "event=note_upsert module=service status=ok mode=edit note_id={}",
                stored.id
            );
        }
        Ok(stored)
    }

    /// Flips the pin flag of one note, leaving every other field untouched.
    ///
    /// # Errors
    /// - `NoteNotFound` when `id` is not stored; nothing is written.
    pub fn toggle_pin(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        let toggled = self
            .store
            .modify(id, |existing| existing.map(|note| note.with_pin_toggled()))?
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        info!(
            "event=note_pin_toggle module=service status=ok note_id={} pinned={}",
            id, toggled.is_pinned
        );
        Ok(toggled)
    }

    /// Deletes one note. Deleting a missing id succeeds without effect.
    pub fn delete(&self, id: NoteId) -> Result<(), NoteServiceError> {
        let removed = self.store.delete(id)?;
        info!(
            "event=note_delete module=service status=ok note_id={} removed={}",
            id, removed
        );
        Ok(())
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        Ok(self.store.get_by_id(id)?)
    }

    /// Lists every note in `order`.
    pub fn list_notes(&self, order: NoteOrder) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.store.list(order)?)
    }

    /// Lists notes in `order` narrowed to those matching `query`.
    pub fn search(&self, order: NoteOrder, query: &str) -> Result<Vec<Note>, NoteServiceError> {
        let notes = self.store.list(order)?;
        Ok(filter_notes(&notes, query))
    }

    /// Starts a live listing in `order`.
    pub fn subscribe(&self, order: NoteOrder) -> Result<LiveNotes, NoteServiceError> {
        Ok(self.store.subscribe(order)?)
    }

    fn fresh_note(&self, request: &UpsertRequest) -> Note {
        Note {
            id: UNASSIGNED_NOTE_ID,
            title: request.title.clone(),
            description: request.description.clone(),
            color_hex: request.color.unwrap_or(DEFAULT_NOTE_COLOR),
            created_at: (self.clock)(),
            is_pinned: false,
            image_uri: request.image_uri_override.clone(),
        }
    }
}

/// Builds the replacement for `existing` described by an edit request.
pub fn merge_edit(existing: Note, request: &UpsertRequest) -> Note {
    Note {
        title: request.title.clone(),
        description: request.description.clone(),
        color_hex: request.color.unwrap_or(existing.color_hex),
        created_at: request.created_at_override.unwrap_or(existing.created_at),
        image_uri: request
            .image_uri_override
            .clone()
            .or(existing.image_uri),
        ..existing
    }
}

#[cfg(test)]
mod tests {
    use super::{merge_edit, NoteServiceError, UpsertRequest};
    use crate::model::note::Note;

    fn stored() -> Note {
        let mut note = Note::new("Groceries", "Milk, eggs", 1_000);
        note.id = 1;
        note.color_hex = 0xFFBB_DEFB;
        note.is_pinned = true;
        note.image_uri = Some("content://media/42".to_string());
        note
    }

    #[test]
    fn merge_overwrites_text_and_keeps_unsupplied_fields() {
        let merged = merge_edit(stored(), &UpsertRequest::edit(1, "New", ""));
        assert_eq!(merged.id, 1);
        assert_eq!(merged.title, "New");
        assert_eq!(merged.description, "");
        assert_eq!(merged.color_hex, 0xFFBB_DEFB);
        assert_eq!(merged.created_at, 1_000);
        assert!(merged.is_pinned);
        assert_eq!(merged.image_uri.as_deref(), Some("content://media/42"));
    }

    #[test]
    fn merge_applies_overrides() {
        let request = UpsertRequest::edit(1, "t", "d")
            .with_color(0xFFFF_CDD2)
            .with_created_at(5_000)
            .with_image_uri("content://media/7");
        let merged = merge_edit(stored(), &request);
        assert_eq!(merged.color_hex, 0xFFFF_CDD2);
        assert_eq!(merged.created_at, 5_000);
        assert_eq!(merged.image_uri.as_deref(), Some("content://media/7"));
        assert!(merged.is_pinned);
    }

    #[test]
    fn blank_title_and_description_is_rejected() {
        let err = UpsertRequest::create("  ", "\n").validate().unwrap_err();
        assert!(matches!(err, NoteServiceError::InvalidInput(_)));
        assert!(UpsertRequest::create("", "body").validate().is_ok());
    }
}
