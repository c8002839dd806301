//! Database repositories
//!
//! Each store is a trait so services can run against Postgres in production
//! and against an in-memory store in tests.

pub mod match_repo;
pub mod question_repo;
pub mod queue_repo;

pub use match_repo::{MatchStore, PgMatchRepository};
pub use question_repo::{PgQuestionRepository, QuestionCatalog};
pub use queue_repo::{PgQueueRepository, QueueStore};
