//! Queue request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::modes;
use crate::error::{AppError, AppResult};
use crate::models::MatchMode;

/// Join queue request
#[derive(Debug, Deserialize, Validate)]
pub struct JoinQueueRequest {
    /// "ranked" or "unranked"
    #[validate(length(min = 1, max = 20))]
    pub mode: String,

    /// Requested time limit; out-of-range values are clamped, not rejected
    pub time_limit_seconds: Option<i32>,
}

impl JoinQueueRequest {
    pub fn match_mode(&self) -> AppResult<MatchMode> {
        MatchMode::parse(&self.mode.to_ascii_lowercase())
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Unsupported mode: {}. Supported modes: {:?}",
                    self.mode,
                    modes::ALL
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        let req: JoinQueueRequest = serde_json::from_str(r#"{"mode":"Ranked"}"#).unwrap();
        assert_eq!(req.match_mode().unwrap(), MatchMode::Ranked);
        assert_eq!(req.time_limit_seconds, None);

        let req: JoinQueueRequest =
            serde_json::from_str(r#"{"mode":"casual","time_limit_seconds":300}"#).unwrap();
        assert!(matches!(req.match_mode(), Err(AppError::Validation(_))));
    }
}
