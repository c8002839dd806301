//! External judge integration
//!
//! Submissions are graded by an external code-execution service. This module
//! holds the language table and the HTTP client for that service; the grading
//! policy itself lives in [`crate::services::SubmissionService`].

pub mod client;
pub mod languages;

pub use client::{HttpJudgeClient, Judge, JudgeError, JudgeRequest, JudgeResponse, JudgeStatus};
pub use languages::Language;

#[cfg(test)]
pub use client::MockJudge;
