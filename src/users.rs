//! Users
//!
//! Owners of notes, identified by their email address

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// Minimal length of a new password
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A registered user
#[derive(Clone, Debug)]
pub struct User {
    /// User ID, the subject of issued tokens
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Normalized email address, unique
    pub email: String,

    /// Argon2 hash of the password
    pub hashed_password: String,

    /// Registration date
    pub created_at: DateTime<Utc>,

    /// Last time the account changed
    pub updated_at: DateTime<Utc>,
}

/// Normalize an email address for storage and lookups
///
/// Surrounding whitespace is dropped and the address is lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
