//! Notes API endpoints
//!
//! Everything related to the notes of the current user

use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use crate::fields::NoteFields;
use crate::mutations;
use crate::notes::Note;
use crate::query::ListOptions;
use crate::query::list_notes;
use crate::storage::Database;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::Message;
use super::PathParameters;
use super::QueryParameters;
use super::Success;

/// Note response going to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Note ID
    #[serde(rename = "_id")]
    pub id: Uuid,

    /// Owner of the note
    #[serde(rename = "user")]
    pub user_id: Uuid,

    pub title: String,

    pub content: String,

    pub is_pinned: bool,

    pub is_archived: bool,

    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Last updated at
    pub updated_at: DateTime<Utc>,
}

impl NoteResponse {
    /// Create a response from a [`Note`](Note)
    fn from_note(note: Note) -> Self {
        Self {
            id: note.id,
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            is_pinned: note.is_pinned,
            is_archived: note.is_archived,
            tags: note.tags,
            color: note.color,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }

    /// Create a response from multiple [`Note`](Note)s
    fn from_note_multiple(notes: Vec<Note>) -> Vec<Self> {
        notes.into_iter().map(Self::from_note).collect()
    }
}

/// List the notes of the current user
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     'http://localhost:5000/api/notes?filter=pinned&limit=5'
/// ```
///
/// Response:
/// ```json
/// [ { "_id": "<uuid>", "title": "Groceries", "isPinned": true ... } ]
/// ```
pub async fn list(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    QueryParameters(pairs): QueryParameters<Vec<(String, String)>>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let options = ListOptions::from_pairs(pairs);

    let notes = list_notes(&database, &current_user.id, &options).await?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

/// Get a single note
pub async fn single(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<NoteResponse>, Error> {
    let note = mutations::find_note(&database, &note_id, &current_user.id).await?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Create a note
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "title": "Groceries", "content": "Milk", "tags": "home, weekly" }' \
///     http://localhost:5000/api/notes
/// ```
///
/// Response:
/// ```json
/// { "_id": "<uuid>", "title": "Groceries", "tags": ["home", "weekly"] ... }
/// ```
pub async fn create(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    Form(form): Form<Map<String, Value>>,
) -> Result<Success<NoteResponse>, Error> {
    let fields = NoteFields::from_map(&form)?;

    let note = mutations::create_note(&database, &current_user.id, fields).await?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Update the given fields of a note
///
/// Fields missing from the body keep their current value
///
/// Request:
/// ```sh
/// curl -v -X PUT -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "color": "olive" }' \
///     http://localhost:5000/api/notes/<uuid>
/// ```
pub async fn update(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<Uuid>,
    Form(form): Form<Map<String, Value>>,
) -> Result<Success<NoteResponse>, Error> {
    let note = mutations::update_note(&database, &note_id, &current_user.id, &form).await?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Flip the pinned flag of a note
pub async fn toggle_pin(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<NoteResponse>, Error> {
    let note = mutations::toggle_pin(&database, &note_id, &current_user.id).await?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Flip the archived flag of a note
pub async fn toggle_archive(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<NoteResponse>, Error> {
    let note = mutations::toggle_archive(&database, &note_id, &current_user.id).await?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Permanently delete a note
///
/// Response:
/// ```json
/// { "msg": "Note deleted" }
/// ```
pub async fn delete(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<Message>, Error> {
    let mutations::Deleted = mutations::delete_note(&database, &note_id, &current_user.id).await?;

    Ok(Success::ok(Message::new("Note deleted")))
}
