//! Matchmaking queue repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{MatchMode, QueueEntry},
};

/// Durable waiting list keyed by user
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Replace any ticket the user holds with a fresh one stamped now
    async fn enqueue(
        &self,
        user_id: &Uuid,
        mode: MatchMode,
        time_limit_seconds: i32,
    ) -> AppResult<QueueEntry>;

    /// Delete the user's ticket. Returns whether one existed.
    async fn remove(&self, user_id: &Uuid) -> AppResult<bool>;

    async fn find(&self, user_id: &Uuid) -> AppResult<Option<QueueEntry>>;

    /// Oldest ticket in `mode` that does not belong to `excluded_user_id`
    async fn oldest_opponent(
        &self,
        mode: MatchMode,
        excluded_user_id: &Uuid,
    ) -> AppResult<Option<QueueEntry>>;

    /// Atomically consume both tickets.
    ///
    /// Succeeds only if both exact tickets still exist; otherwise nothing is
    /// removed and `false` is returned.
    async fn claim_pair(&self, own: &QueueEntry, opponent: &QueueEntry) -> AppResult<bool>;

    /// Put tickets back with their original timestamps. A user who already
    /// holds a newer ticket keeps it.
    async fn restore(&self, entries: &[QueueEntry]) -> AppResult<()>;
}

#[derive(Debug, sqlx::FromRow)]
struct QueueRow {
    user_id: Uuid,
    mode: String,
    time_limit_seconds: i32,
    enqueued_at: DateTime<Utc>,
}

impl TryFrom<QueueRow> for QueueEntry {
    type Error = AppError;

    fn try_from(row: QueueRow) -> Result<Self, Self::Error> {
        let mode = MatchMode::parse(&row.mode)
            .ok_or_else(|| AppError::Database(format!("unknown queue mode '{}'", row.mode)))?;

        Ok(QueueEntry {
            user_id: row.user_id,
            mode,
            time_limit_seconds: row.time_limit_seconds,
            enqueued_at: row.enqueued_at,
        })
    }
}

/// Postgres-backed queue
pub struct PgQueueRepository {
    pool: PgPool,
}

impl PgQueueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueStore for PgQueueRepository {
    async fn enqueue(
        &self,
        user_id: &Uuid,
        mode: MatchMode,
        time_limit_seconds: i32,
    ) -> AppResult<QueueEntry> {
        let row = sqlx::query_as::<_, QueueRow>(
            r#"
            INSERT INTO matchmaking_queue (user_id, mode, time_limit_seconds, enqueued_at)
            VALUES ($1, $2, $3, clock_timestamp())
            ON CONFLICT (user_id) DO UPDATE SET
                mode = EXCLUDED.mode,
                time_limit_seconds = EXCLUDED.time_limit_seconds,
                enqueued_at = EXCLUDED.enqueued_at
            RETURNING user_id, mode, time_limit_seconds, enqueued_at
            "#,
        )
        .bind(user_id)
        .bind(mode.as_str())
        .bind(time_limit_seconds)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn remove(&self, user_id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM matchmaking_queue WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, user_id: &Uuid) -> AppResult<Option<QueueEntry>> {
        let row = sqlx::query_as::<_, QueueRow>(
            r#"
            SELECT user_id, mode, time_limit_seconds, enqueued_at
            FROM matchmaking_queue
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(QueueEntry::try_from).transpose()
    }

    async fn oldest_opponent(
        &self,
        mode: MatchMode,
        excluded_user_id: &Uuid,
    ) -> AppResult<Option<QueueEntry>> {
        let row = sqlx::query_as::<_, QueueRow>(
            r#"
            SELECT user_id, mode, time_limit_seconds, enqueued_at
            FROM matchmaking_queue
            WHERE mode = $1 AND user_id <> $2
            ORDER BY enqueued_at ASC, user_id ASC
            LIMIT 1
            "#,
        )
        .bind(mode.as_str())
        .bind(excluded_user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(QueueEntry::try_from).transpose()
    }

    async fn claim_pair(&self, own: &QueueEntry, opponent: &QueueEntry) -> AppResult<bool> {
        let user_ids = [own.user_id, opponent.user_id];
        let mut tx = self.pool.begin().await?;

        // Lock in a fixed order so two players claiming each other cannot deadlock
        let locked = sqlx::query_as::<_, QueueRow>(
            r#"
            SELECT user_id, mode, time_limit_seconds, enqueued_at
            FROM matchmaking_queue
            WHERE user_id = ANY($1)
            ORDER BY user_id
            FOR UPDATE
            "#,
        )
        .bind(&user_ids[..])
        .fetch_all(&mut *tx)
        .await?;

        let still_waiting = |ticket: &QueueEntry| {
            locked
                .iter()
                .any(|row| row.user_id == ticket.user_id && row.enqueued_at == ticket.enqueued_at)
        };

        if !(still_waiting(own) && still_waiting(opponent)) {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(r#"DELETE FROM matchmaking_queue WHERE user_id = ANY($1)"#)
            .bind(&user_ids[..])
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn restore(&self, entries: &[QueueEntry]) -> AppResult<()> {
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO matchmaking_queue (user_id, mode, time_limit_seconds, enqueued_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id) DO NOTHING
                "#,
            )
            .bind(entry.user_id)
            .bind(entry.mode.as_str())
            .bind(entry.time_limit_seconds)
            .bind(entry.enqueued_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}
