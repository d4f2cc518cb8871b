//! Domain model for persisted notes.
//!
//! # Responsibility
//! - Define the single `Note` record shared by store, service and consumers.
//! - Keep color and identity constants in one place.
//!
//! # Invariants
//! - A note is identified by a store-assigned integer id.
//! - Deletion is permanent; there are no tombstones.

pub mod note;
