//! Submission handler implementations

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    state::AppState,
};

use super::{request::CreateSubmissionRequest, response::SubmissionResultResponse};

/// Grade a submission synchronously
pub async fn create_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateSubmissionRequest>,
) -> AppResult<Json<SubmissionResultResponse>> {
    payload.validate()?;

    let evaluation = state
        .submissions()
        .evaluate(&auth_user.id, &payload)
        .await?;

    Ok(Json(evaluation.into()))
}
