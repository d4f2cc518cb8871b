//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its defaults.
//! - Provide lightweight validation applied before persistence.
//!
//! # Invariants
//! - `id == UNASSIGNED_NOTE_ID` means the note has never been stored.
//! - `created_at` is set once at creation and only replaced explicitly.
//! - `image_uri` is an opaque reference; the image bytes are owned elsewhere,
//!   and its value is stored exactly as given.
//! - `created_at` may precede the epoch (negative) and is stored as given.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned note identifier.
pub type NoteId = i64;

/// Sentinel id for a note that has not been inserted yet.
pub const UNASSIGNED_NOTE_ID: NoteId = 0;

/// Default tag color (pale cyan, ARGB).
pub const DEFAULT_NOTE_COLOR: i64 = 0xFFE0_F7FA;

/// Swatches offered by the note editor, in display order.
pub const NOTE_COLOR_PALETTE: [i64; 5] = [
    0xFFFF_CDD2, // red
    0xFFC8_E6C9, // green
    0xFFFF_F9C4, // yellow
    0xFFBB_DEFB, // blue
    0xFFD1_C4E9, // purple
];

/// Validation errors for note records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    NegativeId(NoteId),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeId(id) => write!(f, "note id must not be negative, got {id}"),
        }
    }
}

impl Error for NoteValidationError {}

/// One user note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Store-assigned id; `UNASSIGNED_NOTE_ID` before the first insert.
    pub id: NoteId,
    pub title: String,
    pub description: String,
    /// ARGB tag color.
    pub color_hex: i64,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    pub is_pinned: bool,
    /// Reference to an externally owned image.
    pub image_uri: Option<String>,
}

impl Note {
    /// Creates an unassigned, unpinned note with the default color.
    pub fn new(title: impl Into<String>, description: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: UNASSIGNED_NOTE_ID,
            title: title.into(),
            description: description.into(),
            color_hex: DEFAULT_NOTE_COLOR,
            created_at,
            is_pinned: false,
            image_uri: None,
        }
    }

    /// Returns whether this note already carries a store-assigned id.
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_NOTE_ID
    }

    /// Returns a copy with only the pin flag flipped.
    pub fn with_pin_toggled(&self) -> Self {
        Self {
            is_pinned: !self.is_pinned,
            ..self.clone()
        }
    }

    /// Checks the id before persistence. Every other field is stored as given.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id < 0 {
            return Err(NoteValidationError::NegativeId(self.id));
        }
        Ok(())
    }
}
