//! Matchmaking queue service
//!
//! A join records (or refreshes) the caller's ticket and then makes one
//! attempt to pair it with the longest-waiting opponent in the same mode.
//! The pair is claimed atomically, so two joins racing for the same
//! opponent can never both win.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    db::repositories::QueueStore,
    error::{AppError, AppResult},
    models::{Match, MatchMode, QueueEntry},
};

use super::MatchService;

/// Result of a pairing attempt
#[derive(Debug, Clone)]
pub enum PairingOutcome {
    /// Still waiting for an opponent
    Queued,
    Matched(Match),
}

/// Queue-based matchmaking service
pub struct MatchmakingService {
    queue: Arc<dyn QueueStore>,
    matches: Arc<MatchService>,
}

impl MatchmakingService {
    pub fn new(queue: Arc<dyn QueueStore>, matches: Arc<MatchService>) -> Self {
        Self { queue, matches }
    }

    /// Join the queue for `mode`. Rejoining replaces the previous ticket.
    pub async fn join(
        &self,
        user_id: &Uuid,
        mode: MatchMode,
        time_limit_seconds: Option<i32>,
    ) -> AppResult<PairingOutcome> {
        let time_limit_seconds = self.matches.sanitize_time_limit(time_limit_seconds);
        let ticket = self
            .queue
            .enqueue(user_id, mode, time_limit_seconds)
            .await?;

        debug!(user_id = %user_id, mode = %mode, time_limit_seconds, "Ticket enqueued");

        self.pair(&ticket).await
    }

    /// Leave the queue. Leaving without a ticket is not an error.
    pub async fn cancel(&self, user_id: &Uuid) -> AppResult<()> {
        let removed = self.queue.remove(user_id).await?;
        debug!(user_id = %user_id, removed, "Queue ticket cancelled");
        Ok(())
    }

    /// Poll for a match.
    ///
    /// A caller still holding a ticket gets another pairing attempt, which
    /// settles waiters whose own join lost a race. Otherwise the most recent
    /// unexpired queue-flow match is reported.
    pub async fn status(&self, user_id: &Uuid) -> AppResult<Option<Uuid>> {
        if let Some(ticket) = self.queue.find(user_id).await? {
            return match self.pair(&ticket).await? {
                PairingOutcome::Matched(created) => Ok(Some(created.id)),
                PairingOutcome::Queued => Ok(None),
            };
        }

        Ok(self
            .matches
            .latest_active_queued_match(user_id)
            .await?
            .map(|m| m.id))
    }

    /// One pairing attempt for `ticket`. Losing the claim race is not an error.
    ///
    /// The match takes the time limit stored on the longer-waiting ticket.
    async fn pair(&self, ticket: &QueueEntry) -> AppResult<PairingOutcome> {
        let Some(opponent) = self
            .queue
            .oldest_opponent(ticket.mode, &ticket.user_id)
            .await?
        else {
            return Ok(PairingOutcome::Queued);
        };

        if !self.queue.claim_pair(ticket, &opponent).await? {
            debug!(
                user_id = %ticket.user_id,
                opponent_id = %opponent.user_id,
                "Pair claim lost, staying queued"
            );
            return Ok(PairingOutcome::Queued);
        }

        let time_limit_seconds = ticket.longer_waiting(&opponent).time_limit_seconds;
        let created = match self
            .matches
            .create_queued_match(
                [opponent.user_id, ticket.user_id],
                ticket.mode,
                time_limit_seconds,
            )
            .await
        {
            Ok(created) => created,
            Err(err) => {
                error!(
                    user_id = %ticket.user_id,
                    opponent_id = %opponent.user_id,
                    error = %err,
                    "Match creation failed after claiming pair, restoring tickets"
                );
                self.restore(&[opponent, ticket.clone()]).await;
                return Err(Self::creation_failure(err));
            }
        };

        info!(
            match_id = %created.id,
            user_id = %ticket.user_id,
            opponent_id = %opponent.user_id,
            mode = %ticket.mode,
            "Players paired"
        );

        Ok(PairingOutcome::Matched(created))
    }

    async fn restore(&self, tickets: &[QueueEntry]) {
        if let Err(err) = self.queue.restore(tickets).await {
            error!(error = %err, "Restoring queue tickets failed, players must rejoin");
        }
    }

    /// Tickets were restored, so the caller can simply retry
    fn creation_failure(err: AppError) -> AppError {
        match err {
            AppError::Configuration(_) | AppError::ServiceUnavailable(_) => err,
            _ => AppError::ServiceUnavailable(
                "Could not create the match, you are still queued".to_string(),
            ),
        }
    }
}
