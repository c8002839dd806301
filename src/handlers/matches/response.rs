//! Match response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{MatchKind, MatchMode, MatchPhase};

/// Friend match created
#[derive(Debug, Serialize)]
pub struct CreateFriendMatchResponse {
    pub match_id: Uuid,
    pub time_limit_seconds: i32,
}

/// Match start acknowledgement
#[derive(Debug, Serialize)]
pub struct StartMatchResponse {
    pub match_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub remaining_seconds: i64,
}

/// A match as seen by one of its players
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub id: Uuid,
    pub mode: MatchMode,
    pub kind: MatchKind,
    pub phase: MatchPhase,
    pub time_limit_seconds: i32,
    pub started_at: Option<DateTime<Utc>>,
    /// Computed server-side; the full limit until the match starts
    pub remaining_seconds: i64,
    pub opponent_id: Option<Uuid>,
    pub inviter_id: Option<Uuid>,
    pub invitee_id: Option<Uuid>,
    pub language: Option<String>,
    pub question: QuestionSummary,
    pub created_at: DateTime<Utc>,
}

/// Question shown to players. Hidden test cases stay server-side.
#[derive(Debug, Serialize)]
pub struct QuestionSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub difficulty: Option<String>,
    pub languages: Vec<String>,
    pub sample: Option<SampleCase>,
    pub total_cases: usize,
}

#[derive(Debug, Serialize)]
pub struct SampleCase {
    pub input: String,
    pub expected_output: String,
}
