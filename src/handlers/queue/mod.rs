//! Matchmaking queue handlers

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

/// Queue routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/join", post(handler::join_queue))
        .route("/cancel", post(handler::cancel_queue))
        .route("/status", get(handler::queue_status))
}
