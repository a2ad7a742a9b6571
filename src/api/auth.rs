//! Authentication API endpoints
//!
//! Registration, login and the current user

use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::password::hash;
use crate::password::verify;
use crate::storage::CreateUserValues;
use crate::storage::Database;
use crate::users::MIN_PASSWORD_LENGTH;
use crate::users::User;
use crate::users::normalize_email;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::JwtKeys;
use super::Success;
use super::current_user::Token;
use super::current_user::generate_token;

/// The user response information
///
/// A subset of all the information, the password hash never leaves the service
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// The user ID
    #[serde(rename = "_id")]
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Last updated at
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    /// Create a user response from a [`User`](User)
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Missing fields are treated as empty
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    name: String,
    email: String,
    password: String,
}

/// Register a new user and hand out a token
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "name": "Jane", "email": "jane@example.com", "password": "verysecret" }' \
///     http://localhost:5000/api/auth/register
/// ```
///
/// Response:
/// ```json
/// { "token": "tokentokentoken", "expiresIn": 3600 }
/// ```
pub async fn register(
    Extension(database): Extension<Database>,
    Extension(jwt_keys): Extension<JwtKeys>,
    Form(form): Form<RegisterForm>,
) -> Result<Success<Token>, Error> {
    let name = form.name.trim();
    let email = normalize_email(&form.email);

    if name.is_empty() || email.is_empty() || form.password.is_empty() {
        return Err(Error::bad_request("Please fill in all fields"));
    }

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let hashed_password = hash(&form.password).map_err(Error::internal_server_error)?;

    let values = CreateUserValues {
        name,
        email: &email,
        hashed_password: &hashed_password,
    };

    let Some(user) = database
        .create_user(&values)
        .await
        .map_err(Error::internal_server_error)?
    else {
        return Err(Error::bad_request("User already exists"));
    };

    tracing::info!("Registered user {}", user.id);

    generate_token(&jwt_keys, &user).map(Success::ok)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    email: String,
    password: String,
}

/// Exchange credentials for a token
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "email": "jane@example.com", "password": "verysecret" }' \
///     http://localhost:5000/api/auth/login
/// ```
///
/// Response:
/// ```json
/// { "token": "tokentokentoken", "expiresIn": 3600 }
/// ```
pub async fn login(
    Extension(database): Extension<Database>,
    Extension(jwt_keys): Extension<JwtKeys>,
    Form(form): Form<LoginForm>,
) -> Result<Success<Token>, Error> {
    let user = database
        .find_single_user_by_email(&normalize_email(&form.email))
        .await
        .map_err(Error::internal_server_error)?;

    // same message for unknown users and wrong passwords
    let Some(user) = user.filter(|user| verify(&user.hashed_password, &form.password)) else {
        return Err(Error::bad_request("Invalid credentials"));
    };

    generate_token(&jwt_keys, &user).map(Success::ok)
}

/// The current user
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:5000/api/auth/user
/// ```
pub async fn user(current_user: CurrentUser) -> Success<UserResponse> {
    Success::ok(UserResponse::from_user(&current_user))
}
