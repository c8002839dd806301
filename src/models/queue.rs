//! Matchmaking queue model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::modes;

/// Matchmaking category that partitions the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Ranked,
    Unranked,
}

impl MatchMode {
    /// Get mode as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ranked => modes::RANKED,
            Self::Unranked => modes::UNRANKED,
        }
    }

    /// Parse mode from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            modes::RANKED => Some(Self::Ranked),
            modes::UNRANKED => Some(Self::Unranked),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A waiting ticket. At most one exists per user.
///
/// `(user_id, enqueued_at)` identifies a specific ticket: a user who re-joins
/// gets a new ticket, and a claim taken against the old one fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub user_id: Uuid,
    pub mode: MatchMode,
    /// Time limit the user asked for, already clamped
    pub time_limit_seconds: i32,
    pub enqueued_at: DateTime<Utc>,
}

impl QueueEntry {
    /// The longer-waiting of two tickets. Ties go to the lower user id.
    ///
    /// The match formed from a pair uses this ticket's time limit.
    pub fn longer_waiting<'a>(&'a self, other: &'a QueueEntry) -> &'a QueueEntry {
        if (self.enqueued_at, self.user_id) <= (other.enqueued_at, other.user_id) {
            self
        } else {
            other
        }
    }

    /// Whether `other` is the very same ticket (not just the same user)
    pub fn same_ticket(&self, other: &QueueEntry) -> bool {
        self.user_id == other.user_id && self.enqueued_at == other.enqueued_at
    }
}
