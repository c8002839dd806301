//! Grading results

use serde::{Deserialize, Serialize};

/// Outcome of running one test case on the judge. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRunResult {
    /// Position of the case in grading order (0-based)
    pub index: usize,
    pub passed: bool,
    /// Judge status description, verbatim
    pub status: String,
    pub actual_output: Option<String>,
    pub stderr: Option<String>,
    pub time_ms: Option<f64>,
    pub memory_kb: Option<i64>,
}

/// Aggregate result of one submission.
///
/// `results` stops at the first failing case, so it may be shorter than the
/// question's test case list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub passed: bool,
    pub results: Vec<TestRunResult>,
}

impl Evaluation {
    pub fn from_results(results: Vec<TestRunResult>) -> Self {
        let passed = !results.is_empty() && results.iter().all(|r| r.passed);
        Self { passed, results }
    }

    /// First failing case, if any
    pub fn first_failure(&self) -> Option<&TestRunResult> {
        self.results.iter().find(|r| !r.passed)
    }
}
