//! Notes

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// A single note, owned by exactly one user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    /// Note ID
    pub id: Uuid,

    /// The user that created the note, never changes
    pub user_id: Uuid,

    /// Title, never empty
    pub title: String,

    /// Content, never empty
    pub content: String,

    /// Pinned to the top of the dashboard
    pub is_pinned: bool,

    /// Moved out of the way
    pub is_archived: bool,

    /// Labels in the order they were given
    pub tags: Vec<String>,

    /// Palette key
    pub color: Option<String>,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Last updated at
    pub updated_at: DateTime<Utc>,
}

/// Boolean flags of a note that can be toggled without a payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteFlag {
    /// `is_pinned`
    Pinned,

    /// `is_archived`
    Archived,
}

impl NoteFlag {
    /// Current value of the flag on a note
    pub fn value_of(self, note: &Note) -> bool {
        match self {
            Self::Pinned => note.is_pinned,
            Self::Archived => note.is_archived,
        }
    }
}
