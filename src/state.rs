//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::{
    config::Config,
    db::repositories::{PgMatchRepository, PgQuestionRepository, PgQueueRepository},
    judge::Judge,
    services::{MatchService, MatchmakingService, SubmissionService},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    pub db: PgPool,

    /// Redis connection manager (rate limiting)
    pub redis: ConnectionManager,

    /// Application configuration
    pub config: Config,

    pub matches: Arc<MatchService>,
    pub matchmaking: MatchmakingService,
    pub submissions: SubmissionService,
}

impl AppState {
    /// Create a new application state, wiring the Postgres stores into the services
    pub fn new(
        db: PgPool,
        redis: ConnectionManager,
        config: Config,
        judge: Option<Arc<dyn Judge>>,
    ) -> Self {
        let queue = Arc::new(PgQueueRepository::new(db.clone()));
        let match_store = Arc::new(PgMatchRepository::new(db.clone()));
        let catalog = Arc::new(PgQuestionRepository::new(db.clone()));

        let matches = Arc::new(MatchService::new(
            match_store,
            catalog.clone(),
            config.matchmaking.clone(),
        ));
        let matchmaking = MatchmakingService::new(queue, matches.clone());
        let submissions = SubmissionService::new(catalog, matches.clone(), judge);

        Self {
            inner: Arc::new(AppStateInner {
                db,
                redis,
                config,
                matches,
                matchmaking,
                submissions,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a clone of the Redis connection manager
    pub fn redis(&self) -> ConnectionManager {
        self.inner.redis.clone()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn matches(&self) -> &MatchService {
        &self.inner.matches
    }

    pub fn matchmaking(&self) -> &MatchmakingService {
        &self.inner.matchmaking
    }

    pub fn submissions(&self) -> &SubmissionService {
        &self.inner.submissions
    }
}
