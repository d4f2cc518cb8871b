//! Client-side note search.
//!
//! # Responsibility
//! - Narrow an already ordered listing to notes matching a query.
//!
//! # Invariants
//! - Filtering never reorders its input.

pub mod filter;
