//! All things related to the storage of users and notes

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

pub use Config as DatabaseConfig;

use crate::notes::Note;
use crate::notes::NoteFlag;
use crate::users::User;
use memory::Memory;
use postgres::Postgres;

mod memory;
mod postgres;

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),

    /// A record that does not satisfy the shape of its collection
    #[error("Invalid record: {0}")]
    InvalidRecord(&'static str),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Storage configuration
pub enum Config {
    /// Detect configuration from environment
    ///
    /// Postgres when `DATABASE_URL` is set, memory otherwise
    DetectConfig,

    /// Volatile in-memory storage
    Memory,
}

/// Handle to the configured storage
#[derive(Clone)]
pub struct Database {
    /// The storage backend
    storage: Arc<dyn Storage>,
}

impl Database {
    /// Create the storage from a configuration
    pub async fn from_config(config: Config) -> Result<Self> {
        let storage: Arc<dyn Storage> = match config {
            Config::DetectConfig => match std::env::var("DATABASE_URL") {
                Ok(url) if !url.is_empty() => Arc::new(Postgres::connect(&url).await?),
                _ => {
                    tracing::warn!("`DATABASE_URL` is not set, notes will live in memory only");
                    Arc::new(Memory::new())
                }
            },
            Config::Memory => Arc::new(Memory::new()),
        };

        Ok(Self { storage })
    }
}

impl Deref for Database {
    type Target = dyn Storage;

    fn deref(&self) -> &Self::Target {
        self.storage.as_ref()
    }
}

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// Display name
    pub name: &'a str,

    /// Normalized email address
    pub email: &'a str,

    /// The hashed password
    pub hashed_password: &'a str,
}

/// Values to create a Note
pub struct CreateNoteValues<'a> {
    /// Owner of the note
    pub user_id: &'a Uuid,

    /// Trimmed title
    pub title: &'a str,

    /// Trimmed content
    pub content: &'a str,

    /// Normalized tags
    pub tags: &'a [String],

    /// Start out pinned
    pub is_pinned: bool,

    /// Start out archived
    pub is_archived: bool,

    /// Palette key
    pub color: Option<&'a str>,
}

/// Values to update a Note
///
/// Every `None` leaves the stored value as it is
#[derive(Default)]
pub struct UpdateNoteValues<'a> {
    /// New title
    pub title: Option<&'a str>,

    /// New content
    pub content: Option<&'a str>,

    /// New tags, replacing all existing ones
    pub tags: Option<&'a [String]>,

    /// New pinned flag
    pub is_pinned: Option<bool>,

    /// New archived flag
    pub is_archived: Option<bool>,

    /// New color, `Some(None)` removes it
    pub color: Option<Option<&'a str>>,
}

/// Selection of notes of a single user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NotesQuery {
    /// Only notes with this flag set
    pub flag: Option<NoteFlag>,

    /// At most this many notes
    pub limit: Option<u32>,
}

/// Criteria for counting notes of a single user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountNotesQuery {
    /// Only notes with this flag set
    pub flag: Option<NoteFlag>,

    /// Only notes created at or after this moment
    pub created_since: Option<DateTime<Utc>>,
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Finds a single user by its ID
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Finds a single user by its normalized email address
    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create a single user
    ///
    /// `None` when the email address is already taken
    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<Option<User>>;

    /// Find the notes of a user
    ///
    /// Most recently updated first
    async fn find_all_notes_by_user(&self, user_id: &Uuid, query: &NotesQuery)
    -> Result<Vec<Note>>;

    /// Count the notes of a user
    async fn count_notes_by_user(&self, user_id: &Uuid, query: &CountNotesQuery) -> Result<u64>;

    /// Find a single note by ID, regardless of its owner
    async fn find_single_note_by_id(&self, id: &Uuid) -> Result<Option<Note>>;

    /// Create a note
    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note>;

    /// Update a note
    ///
    /// `None` when the note no longer exists
    async fn update_note(&self, note: &Note, values: &UpdateNoteValues<'_>)
    -> Result<Option<Note>>;

    /// Flip a flag of a note in a single step
    ///
    /// `None` when the note no longer exists
    async fn toggle_note_flag(&self, note: &Note, flag: NoteFlag) -> Result<Option<Note>>;

    /// Permanently delete a note
    async fn delete_note(&self, note: &Note) -> Result<()>;
}

/// Check the shape of a note before it is written
fn ensure_valid_note(title: Option<&str>, content: Option<&str>) -> Result<()> {
    if title.is_some_and(|title| title.trim().is_empty()) {
        return Err(Error::InvalidRecord("note title can not be empty"));
    }

    if content.is_some_and(|content| content.trim().is_empty()) {
        return Err(Error::InvalidRecord("note content can not be empty"));
    }

    Ok(())
}
