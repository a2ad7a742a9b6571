//! Postgres storage

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::notes::Note;
use crate::notes::NoteFlag;
use crate::users::User;

use super::CountNotesQuery;
use super::CreateNoteValues;
use super::CreateUserValues;
use super::Error;
use super::NotesQuery;
use super::Result;
use super::Storage;
use super::UpdateNoteValues;
use super::ensure_valid_note;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Columns selected into [`SqlxNote`]
const NOTE_COLUMNS: &str = "id, user_id, title, content, is_pinned, is_archived, tags, color, \
                            created_at, updated_at";

/// `SQLx` version of user
#[derive(sqlx::FromRow)]
struct SqlxUser {
    id: Uuid,
    name: String,
    email: String,
    hashed_password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SqlxUser> for User {
    fn from(user: SqlxUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            hashed_password: user.hashed_password,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `SQLx` version of note
#[derive(sqlx::FromRow)]
struct SqlxNote {
    id: Uuid,
    user_id: Uuid,
    title: String,
    content: String,
    is_pinned: bool,
    is_archived: bool,
    tags: Vec<String>,
    color: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SqlxNote> for Note {
    fn from(note: SqlxNote) -> Self {
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
}

/// Split a flag filter into the `is_pinned` and `is_archived` query parameters
fn flag_parameters(flag: Option<NoteFlag>) -> (Option<bool>, Option<bool>) {
    match flag {
        None => (None, None),
        Some(NoteFlag::Pinned) => (Some(true), None),
        Some(NoteFlag::Archived) => (None, Some(true)),
    }
}

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Connect to Postgres
    ///
    /// Migrations will be run
    pub async fn connect(database_url: &str) -> Result<Self> {
        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
            .map_err(connection_error)?;

        Self::with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn with_pool(connection_pool: PgPool) -> Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .map_err(connection_error)?;

        tracing::debug!("Postgres migrations are up to date");

        Ok(Self { connection_pool })
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, SqlxUser>(
            r"
            SELECT *
            FROM users
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(User::from))
    }

    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, SqlxUser>(
            r"
            SELECT *
            FROM users
            WHERE email = $1
            LIMIT 1
            ",
        )
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(User::from))
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<Option<User>> {
        // the unique email index decides between concurrent registrations
        let user = sqlx::query_as::<_, SqlxUser>(
            r"
            INSERT INTO users (id, name, email, hashed_password)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.name)
        .bind(values.email)
        .bind(values.hashed_password)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(User::from))
    }

    async fn find_all_notes_by_user(
        &self,
        user_id: &Uuid,
        query: &NotesQuery,
    ) -> Result<Vec<Note>> {
        let (is_pinned, is_archived) = flag_parameters(query.flag);

        let notes = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            SELECT {NOTE_COLUMNS}
            FROM notes
            WHERE user_id = $1
                AND ($2::BOOLEAN IS NULL OR is_pinned = $2)
                AND ($3::BOOLEAN IS NULL OR is_archived = $3)
            ORDER BY updated_at DESC, created_at DESC
            LIMIT $4
            "
        ))
        .bind(user_id)
        .bind(is_pinned)
        .bind(is_archived)
        .bind(query.limit.map(i64::from))
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(notes.into_iter().map(Note::from).collect())
    }

    async fn count_notes_by_user(&self, user_id: &Uuid, query: &CountNotesQuery) -> Result<u64> {
        let (is_pinned, is_archived) = flag_parameters(query.flag);

        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM notes
            WHERE user_id = $1
                AND ($2::BOOLEAN IS NULL OR is_pinned = $2)
                AND ($3::BOOLEAN IS NULL OR is_archived = $3)
                AND ($4::TIMESTAMPTZ IS NULL OR created_at >= $4)
            ",
        )
        .bind(user_id)
        .bind(is_pinned)
        .bind(is_archived)
        .bind(query.created_since)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        u64::try_from(count).map_err(connection_error)
    }

    async fn find_single_note_by_id(&self, id: &Uuid) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            SELECT {NOTE_COLUMNS}
            FROM notes
            WHERE id = $1
            LIMIT 1
            "
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(note.map(Note::from))
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        ensure_valid_note(Some(values.title), Some(values.content))?;

        let note = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            INSERT INTO notes (id, user_id, title, content, is_pinned, is_archived, tags, color)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {NOTE_COLUMNS}
            "
        ))
        .bind(Uuid::new_v4())
        .bind(values.user_id)
        .bind(values.title)
        .bind(values.content)
        .bind(values.is_pinned)
        .bind(values.is_archived)
        .bind(values.tags)
        .bind(values.color)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(note.into())
    }

    async fn update_note(
        &self,
        note: &Note,
        values: &UpdateNoteValues<'_>,
    ) -> Result<Option<Note>> {
        ensure_valid_note(values.title, values.content)?;

        // color is tri-state, so its presence travels as a separate parameter
        let updated_note = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            UPDATE notes
            SET title = COALESCE($1, title),
                content = COALESCE($2, content),
                tags = COALESCE($3, tags),
                is_pinned = COALESCE($4, is_pinned),
                is_archived = COALESCE($5, is_archived),
                color = CASE WHEN $6 THEN $7::TEXT ELSE color END,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $8
            RETURNING {NOTE_COLUMNS}
            "
        ))
        .bind(values.title)
        .bind(values.content)
        .bind(values.tags)
        .bind(values.is_pinned)
        .bind(values.is_archived)
        .bind(values.color.is_some())
        .bind(values.color.flatten())
        .bind(note.id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(updated_note.map(Note::from))
    }

    async fn toggle_note_flag(&self, note: &Note, flag: NoteFlag) -> Result<Option<Note>> {
        let assignment = match flag {
            NoteFlag::Pinned => "is_pinned = NOT is_pinned",
            NoteFlag::Archived => "is_archived = NOT is_archived",
        };

        let updated_note = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            UPDATE notes
            SET {assignment}, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING {NOTE_COLUMNS}
            "
        ))
        .bind(note.id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(updated_note.map(Note::from))
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        sqlx::query(
            r"
            DELETE FROM notes
            WHERE id = $1
            ",
        )
        .bind(note.id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
