//! CodeDuel - timed 1v1 coding matches
//!
//! This library provides matchmaking, match lifecycle and submission
//! grading for head-to-head programming duels.
//!
//! # Features
//!
//! - Ranked and unranked matchmaking queues with FIFO pairing
//! - Friend invites with a configurable time limit
//! - Server-authoritative match clock
//! - Grading against hidden test cases through an external judge
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Repositories**: Database access
//! - **Models**: Domain models
//! - **Judge**: Client for the external code-execution service

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod judge;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
