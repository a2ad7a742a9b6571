//! Note mutation engine
//!
//! Create, patch, toggle and delete notes on behalf of a caller. Every operation on an
//! existing note looks it up first and runs it through the [ownership guard](crate::ownership).

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::fields::NoteFields;
use crate::notes::Note;
use crate::notes::NoteFlag;
use crate::ownership::Access;
use crate::ownership::authorize;
use crate::storage;
use crate::storage::CreateNoteValues;
use crate::storage::Database;
use crate::storage::UpdateNoteValues;

/// Errors of note operations
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input, correctable by the caller
    #[error("{0}")]
    Validation(String),

    /// No note with the given ID
    #[error("Note not found")]
    NotFound,

    /// The note belongs to someone else
    #[error("Not authorized")]
    Forbidden,

    /// The storage failed
    #[error(transparent)]
    Storage(#[from] storage::Error),
}

/// Result type for note operations
pub type Result<T> = core::result::Result<T, Error>;

/// Confirmation that a note is gone
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deleted;

/// Create a note for `user_id`
///
/// Title and content are required; everything else falls back to its default
///
/// # Errors
///
/// Will return `Err` when title or content is missing, or when the storage fails
pub async fn create_note(database: &Database, user_id: &Uuid, fields: NoteFields) -> Result<Note> {
    let title = fields
        .title
        .ok_or_else(|| Error::Validation("Title is required".to_string()))?;
    let content = fields
        .content
        .ok_or_else(|| Error::Validation("Content is required".to_string()))?;
    let tags = fields.tags.unwrap_or_default();
    let color = fields.color.flatten();

    let values = CreateNoteValues {
        user_id,
        title: &title,
        content: &content,
        tags: &tags,
        is_pinned: fields.is_pinned.unwrap_or(false),
        is_archived: fields.is_archived.unwrap_or(false),
        color: color.as_deref(),
    };

    let note = database.create_note(&values).await?;

    tracing::debug!("Created note {} for user {user_id}", note.id);

    Ok(note)
}

/// Get a single note, if `user_id` owns it
///
/// # Errors
///
/// Will return `Err` when the note is missing or not owned by `user_id`
pub async fn find_note(database: &Database, note_id: &Uuid, user_id: &Uuid) -> Result<Note> {
    let note = database.find_single_note_by_id(note_id).await?;

    match authorize(note.as_ref(), user_id) {
        Access::Allowed => note.ok_or(Error::NotFound),
        Access::Forbidden => {
            tracing::debug!("User {user_id} is not the owner of note {note_id}");
            Err(Error::Forbidden)
        }
        Access::NotFound => Err(Error::NotFound),
    }
}

/// Apply the fields present in `payload` to a note, leaving all others as they are
///
/// The payload is only looked at once the caller is known to own the note
///
/// # Errors
///
/// Will return `Err` when the note is missing or not owned by `user_id`, or when a present
/// field is invalid
pub async fn update_note(
    database: &Database,
    note_id: &Uuid,
    user_id: &Uuid,
    payload: &Map<String, Value>,
) -> Result<Note> {
    let note = find_note(database, note_id, user_id).await?;

    let fields = NoteFields::from_map(payload)?;

    if fields.is_empty() {
        return Ok(note);
    }

    let values = UpdateNoteValues {
        title: fields.title.as_deref(),
        content: fields.content.as_deref(),
        tags: fields.tags.as_deref(),
        is_pinned: fields.is_pinned,
        is_archived: fields.is_archived,
        color: fields.color.as_ref().map(Option::as_deref),
    };

    database
        .update_note(&note, &values)
        .await?
        .ok_or(Error::NotFound)
}

/// Flip the pinned flag of a note
///
/// # Errors
///
/// Will return `Err` when the note is missing or not owned by `user_id`
pub async fn toggle_pin(database: &Database, note_id: &Uuid, user_id: &Uuid) -> Result<Note> {
    toggle(database, note_id, user_id, NoteFlag::Pinned).await
}

/// Flip the archived flag of a note
///
/// # Errors
///
/// Will return `Err` when the note is missing or not owned by `user_id`
pub async fn toggle_archive(database: &Database, note_id: &Uuid, user_id: &Uuid) -> Result<Note> {
    toggle(database, note_id, user_id, NoteFlag::Archived).await
}

async fn toggle(
    database: &Database,
    note_id: &Uuid,
    user_id: &Uuid,
    flag: NoteFlag,
) -> Result<Note> {
    let note = find_note(database, note_id, user_id).await?;

    database
        .toggle_note_flag(&note, flag)
        .await?
        .ok_or(Error::NotFound)
}

/// Permanently remove a note
///
/// # Errors
///
/// Will return `Err` when the note is missing or not owned by `user_id`
pub async fn delete_note(database: &Database, note_id: &Uuid, user_id: &Uuid) -> Result<Deleted> {
    let note = find_note(database, note_id, user_id).await?;

    database.delete_note(&note).await?;

    tracing::debug!("Deleted note {note_id} of user {user_id}");

    Ok(Deleted)
}
