//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::notes::Note;
use crate::notes::NoteFlag;
use crate::users::User;

use super::CountNotesQuery;
use super::CreateNoteValues;
use super::CreateUserValues;
use super::NotesQuery;
use super::Result;
use super::Storage;
use super::UpdateNoteValues;
use super::ensure_valid_note;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All users in storage
    users: Arc<Mutex<HashMap<Uuid, User>>>,

    /// All notes in storage
    notes: Arc<Mutex<HashMap<Uuid, Note>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

/// Does a note match the flag filter?
fn has_flag(note: &Note, flag: Option<NoteFlag>) -> bool {
    flag.is_none_or(|flag| flag.value_of(note))
}

#[async_trait]
impl Storage for Memory {
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<Option<User>> {
        let mut users = self.users.lock().await;

        if users.values().any(|user| user.email == values.email) {
            return Ok(None);
        }

        let now = Utc::now();

        let user = User {
            id: Uuid::new_v4(),
            name: values.name.to_string(),
            email: values.email.to_string(),
            hashed_password: values.hashed_password.to_string(),
            created_at: now,
            updated_at: now,
        };

        users.insert(user.id, user.clone());

        Ok(Some(user))
    }

    async fn find_all_notes_by_user(
        &self,
        user_id: &Uuid,
        query: &NotesQuery,
    ) -> Result<Vec<Note>> {
        let mut notes = self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| &note.user_id == user_id && has_flag(note, query.flag))
            .cloned()
            .collect::<Vec<Note>>();

        notes.sort_by_key(|note| Reverse((note.updated_at, note.created_at)));

        if let Some(limit) = query.limit {
            notes.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        Ok(notes)
    }

    async fn count_notes_by_user(&self, user_id: &Uuid, query: &CountNotesQuery) -> Result<u64> {
        let count = self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| {
                &note.user_id == user_id
                    && has_flag(note, query.flag)
                    && query
                        .created_since
                        .is_none_or(|created_since| note.created_at >= created_since)
            })
            .count();

        Ok(count as u64)
    }

    async fn find_single_note_by_id(&self, id: &Uuid) -> Result<Option<Note>> {
        Ok(self.notes.lock().await.get(id).cloned())
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        ensure_valid_note(Some(values.title), Some(values.content))?;

        let now = Utc::now();

        let note = Note {
            id: Uuid::new_v4(),
            user_id: *values.user_id,
            title: values.title.to_string(),
            content: values.content.to_string(),
            is_pinned: values.is_pinned,
            is_archived: values.is_archived,
            tags: values.tags.to_vec(),
            color: values.color.map(ToString::to_string),
            created_at: now,
            updated_at: now,
        };

        self.notes.lock().await.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update_note(
        &self,
        note: &Note,
        values: &UpdateNoteValues<'_>,
    ) -> Result<Option<Note>> {
        ensure_valid_note(values.title, values.content)?;

        Ok(self.notes.lock().await.get_mut(&note.id).map(|note| {
            if let Some(title) = values.title {
                note.title = title.to_string();
            }

            if let Some(content) = values.content {
                note.content = content.to_string();
            }

            if let Some(tags) = values.tags {
                note.tags = tags.to_vec();
            }

            if let Some(is_pinned) = values.is_pinned {
                note.is_pinned = is_pinned;
            }

            if let Some(is_archived) = values.is_archived {
                note.is_archived = is_archived;
            }

            if let Some(color) = values.color {
                note.color = color.map(ToString::to_string);
            }

            note.updated_at = Utc::now();

            note.clone()
        }))
    }

    async fn toggle_note_flag(&self, note: &Note, flag: NoteFlag) -> Result<Option<Note>> {
        Ok(self.notes.lock().await.get_mut(&note.id).map(|note| {
            match flag {
                NoteFlag::Pinned => note.is_pinned = !note.is_pinned,
                NoteFlag::Archived => note.is_archived = !note.is_archived,
            }

            note.updated_at = Utc::now();

            note.clone()
        }))
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        self.notes.lock().await.remove(&note.id);

        Ok(())
    }
}
