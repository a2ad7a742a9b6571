mod auth;
mod notes;
mod stats;
