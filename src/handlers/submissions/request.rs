//! Submission request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::constants::{MAX_LANGUAGE_LENGTH, MAX_SOURCE_CODE_SIZE};

/// Create submission request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubmissionRequest {
    /// Question to grade against
    pub question_id: Uuid,

    /// Match the submission belongs to (optional - practice runs omit it)
    pub match_id: Option<Uuid>,

    /// Programming language
    #[validate(length(min = 1, max = MAX_LANGUAGE_LENGTH))]
    pub language: String,

    /// Source code
    #[validate(length(min = 1, max = MAX_SOURCE_CODE_SIZE))]
    pub source_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_is_invalid() {
        let req = CreateSubmissionRequest {
            question_id: Uuid::new_v4(),
            match_id: None,
            language: "python".to_string(),
            source_code: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_match_id_is_optional() {
        let body = format!(
            r#"{{"question_id":"{}","language":"cpp","source_code":"int main(){{}}"}}"#,
            Uuid::new_v4()
        );
        let req: CreateSubmissionRequest = serde_json::from_str(&body).unwrap();
        assert!(req.match_id.is_none());
        assert!(req.validate().is_ok());
    }
}
