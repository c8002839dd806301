//! Submission response DTOs

use serde::Serialize;

use crate::models::{Evaluation, TestRunResult};

/// Grading outcome. `results` stops at the first failing case.
#[derive(Debug, Serialize)]
pub struct SubmissionResultResponse {
    pub passed: bool,
    pub results: Vec<TestRunResult>,
}

impl From<Evaluation> for SubmissionResultResponse {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            passed: evaluation.passed,
            results: evaluation.results,
        }
    }
}
