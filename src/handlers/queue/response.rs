//! Queue response DTOs

use serde::Serialize;
use uuid::Uuid;

/// Join queue response: `{"status": "queued"}` or `{"match_id": "..."}`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JoinQueueResponse {
    Queued { status: QueuedStatus },
    Matched { match_id: Uuid },
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueuedStatus {
    Queued,
}

impl JoinQueueResponse {
    pub fn queued() -> Self {
        Self::Queued {
            status: QueuedStatus::Queued,
        }
    }
}

/// Cancel response
#[derive(Debug, Serialize)]
pub struct CancelQueueResponse {
    pub ok: bool,
}

/// Status response; `match_id` is null while still waiting
#[derive(Debug, Serialize)]
pub struct QueueStatusResponse {
    pub match_id: Option<Uuid>,
}
