//! Submission evaluation service
//!
//! Grades source code against a question's hidden test cases, one judge run
//! per case, in stored order, stopping at the first failure.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    db::repositories::QuestionCatalog,
    error::{AppError, AppResult},
    handlers::submissions::request::CreateSubmissionRequest,
    judge::{Judge, JudgeRequest, Language},
    models::{Evaluation, TestRunResult},
};

use super::{catalog_unavailable, MatchService};

/// Submission evaluation service
pub struct SubmissionService {
    catalog: Arc<dyn QuestionCatalog>,
    matches: Arc<MatchService>,
    /// `None` when no judge endpoint is configured
    judge: Option<Arc<dyn Judge>>,
}

impl SubmissionService {
    pub fn new(
        catalog: Arc<dyn QuestionCatalog>,
        matches: Arc<MatchService>,
        judge: Option<Arc<dyn Judge>>,
    ) -> Self {
        Self {
            catalog,
            matches,
            judge,
        }
    }

    /// Evaluate a submission.
    ///
    /// `results` holds one entry per case actually run, so it can be shorter
    /// than the question's test case list.
    pub async fn evaluate(
        &self,
        user_id: &Uuid,
        payload: &CreateSubmissionRequest,
    ) -> AppResult<Evaluation> {
        let language = Language::for_name(&payload.language).ok_or_else(|| {
            AppError::Validation(format!("Unsupported language: {}", payload.language))
        })?;

        let question = self
            .catalog
            .question_by_id(&payload.question_id)
            .await
            .map_err(catalog_unavailable)?
            .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

        // Grading nothing must never count as a pass
        if question.test_cases.is_empty() {
            error!(question_id = %question.id, slug = %question.slug, "Question has no test cases");
            return Err(AppError::Configuration(
                "Question has no test cases configured".to_string(),
            ));
        }

        if !question.allows_language(language.name()) {
            return Err(AppError::Validation(format!(
                "Language {} is not allowed for this question",
                language.name()
            )));
        }

        if let Some(match_id) = &payload.match_id {
            self.matches
                .ensure_accepting_submissions(match_id, user_id, &question.id)
                .await?;
        }

        let judge = self.judge.as_ref().ok_or_else(|| {
            error!("Submission received but no judge endpoint is configured");
            AppError::Configuration("Judge endpoint is not configured".to_string())
        })?;

        let mut results = Vec::with_capacity(question.test_cases.len());

        for (index, case) in question.test_cases.iter().enumerate() {
            let request = JudgeRequest {
                language_id: language.judge_id(),
                source_code: payload.source_code.clone(),
                stdin: case.input.clone(),
                expected_output: case.expected_output.clone(),
            };

            let verdict = judge.run(&request).await.map_err(|e| {
                warn!(question_id = %question.id, case = index, error = %e, "Judge run failed");
                AppError::from(e)
            })?;

            let passed = verdict.is_accepted();
            debug!(
                question_id = %question.id,
                case = index,
                status = %verdict.status.description,
                passed,
                "Test case judged"
            );

            results.push(TestRunResult {
                index,
                passed,
                status: verdict.status.description.clone(),
                actual_output: verdict.stdout.clone(),
                stderr: verdict.diagnostics(),
                time_ms: verdict.time_ms(),
                memory_kb: verdict.memory,
            });

            if !passed {
                break;
            }
        }

        let evaluation = Evaluation::from_results(results);

        info!(
            user_id = %user_id,
            question_id = %question.id,
            match_id = ?payload.match_id,
            language = language.name(),
            passed = evaluation.passed,
            cases_run = evaluation.results.len(),
            total_cases = question.test_cases.len(),
            "Submission evaluated"
        );

        Ok(evaluation)
    }
}
