//! Plain-text renderings of notes for sharing and export.
//!
//! # Responsibility
//! - Render note listings into the `notes.txt` export layout.
//! - Render single notes for share sheets and card labels.
//!
//! # Invariants
//! - Rendering never reorders notes; callers pass the listing they display.
//! - Dates are rendered in UTC so exports are reproducible.

pub mod text;
