//! Match handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    state::AppState,
};

use super::{
    request::CreateFriendMatchRequest,
    response::{CreateFriendMatchResponse, MatchResponse, StartMatchResponse},
};

/// Create an unranked match against a chosen friend
pub async fn create_friend_match(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateFriendMatchRequest>,
) -> AppResult<(StatusCode, Json<CreateFriendMatchResponse>)> {
    payload.validate()?;

    let created = state
        .matches()
        .create_friend_invite_match(
            &auth_user.id,
            &payload.friend_user_id,
            payload.time_limit_seconds,
            payload.language.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateFriendMatchResponse {
            match_id: created.id,
            time_limit_seconds: created.time_limit_seconds,
        }),
    ))
}

/// Start the match clock (idempotent)
pub async fn start_match(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StartMatchResponse>> {
    let started_at = state.matches().start_match(&id, &auth_user.id).await?;
    let record = state.matches().match_for_participant(&id, &auth_user.id).await?;

    Ok(Json(StartMatchResponse {
        match_id: id,
        started_at,
        remaining_seconds: record.remaining_seconds(),
    }))
}

/// Get a match the caller plays in
pub async fn get_match(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MatchResponse>> {
    let view = state.matches().get_match(&id, &auth_user.id).await?;

    Ok(Json(view))
}
