//! API response helpers

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::mutations;

/// Hold data for a successful API interaction
///
/// The data is the body, as is
pub struct Success<V>
where
    V: Serialize,
{
    status_code: StatusCode,
    data: V,
}

impl<V> Success<V>
where
    V: Serialize,
{
    pub fn ok(data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            data,
        }
    }
}

impl<V> IntoResponse for Success<V>
where
    V: Serialize,
{
    fn into_response(self) -> Response {
        (self.status_code, Json(self.data)).into_response()
    }
}

/// A plain message body, like `{ "msg": "Note deleted" }`
#[derive(Debug, Serialize)]
pub struct Message {
    msg: String,
}

impl Message {
    pub fn new<M>(msg: M) -> Self
    where
        M: ToString,
    {
        Self {
            msg: msg.to_string(),
        }
    }
}

/// Hold data for a failed API interaction
#[derive(Debug)]
pub struct Error {
    status_code: StatusCode,
    message: String,
    description: Option<String>,
}

impl Error {
    fn new<M>(status_code: StatusCode, message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code,
            message: message.to_string(),
            description: None,
        }
    }

    pub fn bad_request<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// A server error, the cause is logged and never shown to the client
    pub fn internal_server_error<E>(err: E) -> Self
    where
        E: std::fmt::Display,
    {
        tracing::error!("Internal server error: {err}");

        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    }

    #[must_use]
    pub fn with_description<M>(self, description: M) -> Self
    where
        M: ToString,
    {
        Self {
            description: Some(description.to_string()),
            ..self
        }
    }
}

impl From<mutations::Error> for Error {
    fn from(err: mutations::Error) -> Self {
        match err {
            mutations::Error::Validation(message) => Self::bad_request(message),
            mutations::Error::NotFound => Self::not_found(err),
            // "not yours" is reported as 401, distinct from 404
            mutations::Error::Forbidden => Self::unauthorized(err),
            mutations::Error::Storage(err) => Self::internal_server_error(err),
        }
    }
}

#[derive(Serialize)]
struct ErrorWrapper {
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(ErrorWrapper {
                msg: self.message,
                description: self.description,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage;

    #[test]
    fn test_from_mutation_error() {
        let error = Error::from(mutations::Error::NotFound);
        assert_eq!(StatusCode::NOT_FOUND, error.status_code);
        assert_eq!("Note not found", error.message);

        let error = Error::from(mutations::Error::Forbidden);
        assert_eq!(StatusCode::UNAUTHORIZED, error.status_code);
        assert_eq!("Not authorized", error.message);

        let error = Error::from(mutations::Error::Validation("Title is required".to_string()));
        assert_eq!(StatusCode::BAD_REQUEST, error.status_code);
        assert_eq!("Title is required", error.message);
    }

    #[test]
    fn test_storage_error_is_not_leaked() {
        let error = Error::from(mutations::Error::Storage(storage::Error::Connection(
            "password authentication failed for user \"jotter\"".to_string(),
        )));

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, error.status_code);
        assert_eq!("Server error", error.message);
        assert_eq!(None, error.description);
    }
}
