//! User domain model.
//!
//! # Responsibility
//! - Define the canonical user record as stored in the `User` table.
//!
//! # Invariants
//! - `user_id` is assigned by the caller and never reused for another person.
//! - `name` is optional; legacy rows migrated from older stores keep `None`.

/// Caller-assigned identifier for a registered user.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type UserId = i64;

/// Canonical user record.
///
/// Identity is chosen by the caller rather than generated, so a duplicate
/// `user_id` is a domain error the repository reports explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Caller-assigned stable ID.
    pub user_id: UserId,
    /// Age in whole years.
    pub age: u32,
    /// Free-form gender label as entered at registration.
    pub gender: String,
    /// Optional display name. `None` for rows predating the name column.
    pub name: Option<String>,
}

impl User {
    /// Creates a user without a display name.
    pub fn new(user_id: UserId, age: u32, gender: impl Into<String>) -> Self {
        Self {
            user_id,
            age,
            gender: gender.into(),
            name: None,
        }
    }

    /// Creates a user with a display name.
    pub fn named(
        user_id: UserId,
        age: u32,
        gender: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(user_id, age, gender)
        }
    }
}
