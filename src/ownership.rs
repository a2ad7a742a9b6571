//! Ownership guard
//!
//! Decides whether a caller may read or alter a note. The store does not enforce ownership,
//! so every single-note operation has to pass through here first.

use uuid::Uuid;

use crate::notes::Note;

/// Outcome of an ownership check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// The caller owns the note
    Allowed,

    /// The note exists but belongs to someone else
    Forbidden,

    /// There is no such note
    NotFound,
}

/// Check if `caller` may act on `note`
pub fn authorize(note: Option<&Note>, caller: &Uuid) -> Access {
    match note {
        None => Access::NotFound,
        Some(note) if &note.user_id != caller => Access::Forbidden,
        Some(_) => Access::Allowed,
    }
}
