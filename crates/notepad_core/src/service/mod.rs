//! Note use-case services.
//!
//! # Responsibility
//! - Turn user-level edit requests into fully populated note records.
//! - Keep consumers decoupled from storage details.

pub mod note_service;
