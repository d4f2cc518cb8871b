//! Repository layer over the `notes` table.
//!
//! # Responsibility
//! - Define the note data-access contract.
//! - Keep SQL details out of the store and service layers.
//!
//! # Invariants
//! - Writes call `Note::validate()` before any SQL mutation.
//! - Reads reject malformed rows instead of masking them.

pub mod note_repo;
