//! Business logic services

pub mod auth_service;
pub mod match_service;
pub mod matchmaking_service;
pub mod submission_service;

pub use auth_service::AuthService;
pub use match_service::MatchService;
pub use matchmaking_service::{MatchmakingService, PairingOutcome};
pub use submission_service::SubmissionService;

use tracing::warn;

use crate::error::AppError;

/// The catalog is a dependency, so its storage failures read as temporary outages
pub(crate) fn catalog_unavailable(err: AppError) -> AppError {
    match err {
        AppError::Database(message) => {
            warn!(error = %message, "Question catalog unavailable");
            AppError::ServiceUnavailable("Question catalog is unavailable".to_string())
        }
        other => other,
    }
}
