//! Match request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_LANGUAGE_LENGTH;

/// Create friend match request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFriendMatchRequest {
    pub friend_user_id: Uuid,

    /// Clamped to the allowed window; defaults when absent
    pub time_limit_seconds: Option<i32>,

    /// Restricts question selection to ones supporting this language
    #[validate(length(min = 1, max = MAX_LANGUAGE_LENGTH))]
    pub language: Option<String>,
}
