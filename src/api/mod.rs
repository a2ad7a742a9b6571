//! All API endpoint setup

use axum::Router;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;

pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use request::Form;
pub use request::PathParameters;
pub use request::QueryParameters;
pub use response::Error;
pub use response::Message;
pub use response::Success;

mod auth;
mod current_user;
mod notes;
mod request;
mod response;
mod stats;

/// Get the Axum router for all API routes
pub fn router() -> Router {
    let auth = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/user", get(auth::user));

    let notes = Router::new()
        .route("/", get(notes::list).post(notes::create))
        .route(
            "/{note}",
            get(notes::single).put(notes::update).delete(notes::delete),
        )
        .route("/{note}/pin", put(notes::toggle_pin))
        .route("/{note}/archive", put(notes::toggle_archive));

    Router::new()
        .nest("/auth", auth)
        .nest("/notes", notes)
        .route("/stats", get(stats::stats))
}

/// Fallback for anything that is not a known route
pub async fn fallback() -> Error {
    Error::not_found("Not found")
}
