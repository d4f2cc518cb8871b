//! Note store: the single source of truth for note records.
//!
//! # Responsibility
//! - Serialize every mutation through one owned SQLite connection.
//! - Push fresh ordered snapshots to live-query subscribers after each write.
//!
//! # Invariants
//! - Writes are applied in arrival order (last write wins by arrival).
//! - Subscribers observe snapshots in the same order the writes were applied.
//! - Publishing never blocks a writer on a slow reader: unread snapshots
//!   coalesce, so each subscriber holds at most one pending snapshot.
//! - One-shot reads share the connection lock with writers and wait for an
//!   in-flight write to finish.

mod live;
mod note_store;

pub use live::LiveNotes;
pub use note_store::NoteStore;
