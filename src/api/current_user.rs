//! Current user service
//!
//! Get the current user from the request based on the `Authorization` header, or the
//! `x-auth-token` header older clients send

use std::ops::Deref;
use std::sync::Arc;

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::api::Error;
use crate::storage::Database;
use crate::users::User;

/// Header carrying a bare token
const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// The keys used for encoding/decoding JWT tokens
#[derive(Clone)]
pub struct JwtKeys {
    /// The encoding key
    encoding: EncodingKey,

    /// The decoding key
    decoding: DecodingKey,

    /// How long a token stays valid, in seconds
    expires_in: i64,
}

impl JwtKeys {
    /// Create new encoding/decoding keys, derived from a secret
    pub fn new(secret: &[u8], expires_in: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            expires_in,
        }
    }
}

/// The JWT claims to identify a user
#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    /// The user ID
    sub: Uuid,

    /// Expiration time, as a UNIX timestamp
    exp: i64,
}

/// Token information served to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// The token to provide to follow up requests
    token: String,

    /// In how many seconds does the token expire
    expires_in: i64,
}

/// Current user service
#[derive(Clone, Debug)]
pub struct CurrentUser {
    /// The actual user
    user: Arc<User>,
}

impl CurrentUser {
    /// Create the current user from a user
    fn new(user: User) -> Self {
        Self {
            user: Arc::new(user),
        }
    }
}

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

/// Generate a token for the outside world for a given user
pub fn generate_token(jwt_keys: &JwtKeys, user: &User) -> Result<Token, Error> {
    use jsonwebtoken::Header;
    use jsonwebtoken::encode;

    let claims = Claims {
        sub: user.id,
        exp: chrono::Utc::now().timestamp() + jwt_keys.expires_in,
    };

    let token = encode(&Header::default(), &claims, &jwt_keys.encoding)
        .map_err(Error::internal_server_error)?;

    Ok(Token {
        token,
        expires_in: jwt_keys.expires_in,
    })
}

/// Find the raw token in the request headers
async fn extract_token<S>(parts: &mut Parts, state: &S) -> Option<String>
where
    S: Send + Sync,
{
    if let Ok(TypedHeader(Authorization(bearer))) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
    {
        return Some(bearer.token().to_string());
    }

    parts
        .headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        use jsonwebtoken::Validation;
        use jsonwebtoken::decode;

        let token = extract_token(parts, state)
            .await
            .ok_or_else(|| Error::unauthorized("No token, authorization denied"))?;

        let Extension(jwt_keys) = parts
            .extract::<Extension<JwtKeys>>()
            .await
            .map_err(Error::internal_server_error)?;

        let Extension(database) = parts
            .extract::<Extension<Database>>()
            .await
            .map_err(Error::internal_server_error)?;

        // Decode the user data
        let token_data = decode::<Claims>(&token, &jwt_keys.decoding, &Validation::default())
            .map_err(|err| {
                tracing::debug!("Rejected token: {err}");
                Error::unauthorized("Token is not valid")
            })?;

        let user = database
            .find_single_user_by_id(&token_data.claims.sub)
            .await
            .map_err(Error::internal_server_error)?;

        user.map(CurrentUser::new)
            .ok_or_else(|| Error::unauthorized("Token is not valid"))
    }
}
