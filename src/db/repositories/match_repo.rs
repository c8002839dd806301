//! Match repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Match, MatchKind, MatchMode, NewMatch},
};

/// Storage for matches and their players
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn create(&self, new_match: &NewMatch) -> AppResult<Match>;

    /// Attach both players in one write: afterwards the match has two players or none
    async fn attach_players(&self, match_id: &Uuid, players: [Uuid; 2]) -> AppResult<()>;

    async fn delete(&self, match_id: &Uuid) -> AppResult<()>;

    async fn find_by_id(&self, match_id: &Uuid) -> AppResult<Option<Match>>;

    async fn players(&self, match_id: &Uuid) -> AppResult<Vec<Uuid>>;

    /// Most recently created match of `kind` the user is attached to
    async fn latest_for_user(&self, user_id: &Uuid, kind: MatchKind) -> AppResult<Option<Match>>;

    /// Set `started_at` if unset and return the surviving value.
    ///
    /// `None` means the match does not exist.
    async fn mark_started(&self, match_id: &Uuid) -> AppResult<Option<DateTime<Utc>>>;
}

#[derive(Debug, sqlx::FromRow)]
struct MatchRow {
    id: Uuid,
    mode: String,
    question_id: Uuid,
    time_limit_seconds: i32,
    started_at: Option<DateTime<Utc>>,
    kind: String,
    inviter_id: Option<Uuid>,
    invitee_id: Option<Uuid>,
    language: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MatchRow> for Match {
    type Error = AppError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let mode = MatchMode::parse(&row.mode)
            .ok_or_else(|| AppError::Database(format!("unknown match mode '{}'", row.mode)))?;
        let kind = MatchKind::parse(&row.kind)
            .ok_or_else(|| AppError::Database(format!("unknown match kind '{}'", row.kind)))?;

        Ok(Match {
            id: row.id,
            mode,
            question_id: row.question_id,
            time_limit_seconds: row.time_limit_seconds,
            started_at: row.started_at,
            kind,
            inviter_id: row.inviter_id,
            invitee_id: row.invitee_id,
            language: row.language,
            created_at: row.created_at,
        })
    }
}

/// Postgres-backed match store
pub struct PgMatchRepository {
    pool: PgPool,
}

impl PgMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for PgMatchRepository {
    async fn create(&self, new_match: &NewMatch) -> AppResult<Match> {
        let row = sqlx::query_as::<_, MatchRow>(
            r#"
            INSERT INTO matches (
                mode, question_id, time_limit_seconds, started_at, kind,
                inviter_id, invitee_id, language
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new_match.mode.as_str())
        .bind(new_match.question_id)
        .bind(new_match.time_limit_seconds)
        .bind(new_match.started_at)
        .bind(new_match.kind.as_str())
        .bind(new_match.inviter_id)
        .bind(new_match.invitee_id)
        .bind(new_match.language.as_deref())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn attach_players(&self, match_id: &Uuid, players: [Uuid; 2]) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO match_players (match_id, user_id)
            VALUES ($1, $2), ($1, $3)
            "#,
        )
        .bind(match_id)
        .bind(players[0])
        .bind(players[1])
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, match_id: &Uuid) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM matches WHERE id = $1"#)
            .bind(match_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, match_id: &Uuid) -> AppResult<Option<Match>> {
        let row = sqlx::query_as::<_, MatchRow>(r#"SELECT * FROM matches WHERE id = $1"#)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Match::try_from).transpose()
    }

    async fn players(&self, match_id: &Uuid) -> AppResult<Vec<Uuid>> {
        let players: Vec<Uuid> = sqlx::query_scalar(
            r#"SELECT user_id FROM match_players WHERE match_id = $1 ORDER BY joined_at, user_id"#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(players)
    }

    async fn latest_for_user(&self, user_id: &Uuid, kind: MatchKind) -> AppResult<Option<Match>> {
        let row = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT m.*
            FROM matches m
            JOIN match_players mp ON mp.match_id = m.id
            WHERE mp.user_id = $1 AND m.kind = $2
            ORDER BY m.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Match::try_from).transpose()
    }

    async fn mark_started(&self, match_id: &Uuid) -> AppResult<Option<DateTime<Utc>>> {
        // The row lock serializes concurrent starts; the loser reads the winner's value
        let started_at: Option<Option<DateTime<Utc>>> = sqlx::query_scalar(
            r#"
            UPDATE matches
            SET started_at = COALESCE(started_at, now())
            WHERE id = $1
            RETURNING started_at
            "#,
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(started_at.flatten())
    }
}
