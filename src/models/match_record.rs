//! Match model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::match_kinds;

use super::MatchMode;

/// How a match came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Queued,
    FriendInvite,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => match_kinds::QUEUED,
            Self::FriendInvite => match_kinds::FRIEND_INVITE,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            match_kinds::QUEUED => Some(Self::Queued),
            match_kinds::FRIEND_INVITE => Some(Self::FriendInvite),
            _ => None,
        }
    }
}

/// Derived lifecycle state. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPhase {
    /// Created, nobody has entered yet
    Created,
    Started,
    Expired,
}

/// Match record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub mode: MatchMode,
    pub question_id: Uuid,
    pub time_limit_seconds: i32,
    /// Set once, never rewritten
    pub started_at: Option<DateTime<Utc>>,
    pub kind: MatchKind,
    pub inviter_id: Option<Uuid>,
    pub invitee_id: Option<Uuid>,
    /// Preferred language picked by the inviter
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values needed to insert a match row
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub mode: MatchMode,
    pub question_id: Uuid,
    pub time_limit_seconds: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub kind: MatchKind,
    pub inviter_id: Option<Uuid>,
    pub invitee_id: Option<Uuid>,
    pub language: Option<String>,
}

impl Match {
    /// Lifecycle phase as of `now`
    pub fn phase_at(&self, now: DateTime<Utc>) -> MatchPhase {
        match self.started_at {
            None => MatchPhase::Created,
            Some(_) if self.remaining_seconds_at(now) == 0 => MatchPhase::Expired,
            Some(_) => MatchPhase::Started,
        }
    }

    /// Seconds left on the clock, clamped to `[0, time_limit_seconds]`.
    ///
    /// An unstarted match reports its full limit.
    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        let limit = i64::from(self.time_limit_seconds.max(0));
        match self.started_at {
            None => limit,
            Some(started_at) => {
                let elapsed = (now - started_at).num_seconds().max(0);
                (limit - elapsed).max(0)
            }
        }
    }

    pub fn remaining_seconds(&self) -> i64 {
        self.remaining_seconds_at(Utc::now())
    }

    pub fn is_expired(&self) -> bool {
        self.phase_at(Utc::now()) == MatchPhase::Expired
    }
}
