//! Match handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Match routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/friend", post(handler::create_friend_match))
        .route("/{id}", get(handler::get_match))
        .route("/{id}/start", post(handler::start_match))
}
