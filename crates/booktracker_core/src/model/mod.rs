//! Domain model for the Booktracker store.
//!
//! # Responsibility
//! - Define the canonical data structures used by repositories and services.
//!
//! # Invariants
//! - Identities are caller-visible integer keys straight from the store.

pub mod user;
