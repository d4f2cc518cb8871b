//! Case-insensitive substring filtering over note listings.

use crate::model::note::Note;

/// Returns whether `note` matches `query` on title or description.
///
/// Matching is a case-insensitive substring test; an empty query matches
/// every note.
pub fn matches_query(note: &Note, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    contains_folded(&note.title, &needle) || contains_folded(&note.description, &needle)
}

/// Keeps the notes matching `query`, preserving input order.
pub fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    if query.is_empty() {
        return notes.to_vec();
    }
    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|note| {
            contains_folded(&note.title, &needle) || contains_folded(&note.description, &needle)
        })
        .cloned()
        .collect()
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}
