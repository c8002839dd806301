//! Queue handler implementations

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::PairingOutcome,
    state::AppState,
};

use super::{
    request::JoinQueueRequest,
    response::{CancelQueueResponse, JoinQueueResponse, QueueStatusResponse},
};

/// Join the matchmaking queue and try to pair immediately
pub async fn join_queue(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<JoinQueueRequest>,
) -> AppResult<Json<JoinQueueResponse>> {
    payload.validate()?;
    let mode = payload.match_mode()?;

    let outcome = state
        .matchmaking()
        .join(&auth_user.id, mode, payload.time_limit_seconds)
        .await?;

    Ok(Json(match outcome {
        PairingOutcome::Queued => JoinQueueResponse::queued(),
        PairingOutcome::Matched(created) => JoinQueueResponse::Matched {
            match_id: created.id,
        },
    }))
}

/// Leave the queue
pub async fn cancel_queue(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<CancelQueueResponse>> {
    state.matchmaking().cancel(&auth_user.id).await?;

    Ok(Json(CancelQueueResponse { ok: true }))
}

/// Poll for a match
pub async fn queue_status(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<QueueStatusResponse>> {
    let match_id = state.matchmaking().status(&auth_user.id).await?;

    Ok(Json(QueueStatusResponse { match_id }))
}
