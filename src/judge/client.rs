//! HTTP client for the external judge
//!
//! Runs a single `(source, language, stdin, expected_output)` tuple in
//! blocking mode (`wait=true`): one round trip per test case, no polling.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::JudgeConfig;
use crate::constants::{JUDGE_ACCEPTED_STATUS, JUDGE_AUTH_HEADER};

/// One run request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgeRequest {
    pub language_id: i32,
    pub source_code: String,
    pub stdin: String,
    pub expected_output: String,
}

/// Judge verdict for one run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JudgeResponse {
    pub status: JudgeStatus,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    /// Wall time in seconds, as the judge formats it (e.g. `"0.012"`)
    pub time: Option<String>,
    /// Peak memory in KB
    pub memory: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JudgeStatus {
    pub id: Option<i32>,
    pub description: String,
}

impl JudgeResponse {
    /// Exact match on the judge's accepted status; anything else fails the case
    pub fn is_accepted(&self) -> bool {
        self.status.description == JUDGE_ACCEPTED_STATUS
    }

    pub fn time_ms(&self) -> Option<f64> {
        self.time
            .as_deref()
            .and_then(|t| t.trim().parse::<f64>().ok())
            .map(|secs| secs * 1000.0)
    }

    /// Diagnostic output: runtime stderr, falling back to compiler output
    pub fn diagnostics(&self) -> Option<String> {
        self.stderr
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.compile_output.clone().filter(|s| !s.is_empty()))
    }
}

/// Errors from the judge transport. Never a graded verdict.
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    /// Network, timeout, TLS or body decoding failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The judge answered with a non-2xx status
    #[error("judge returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// A code-execution backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Judge: Send + Sync {
    /// Execute one run and return the judge's verdict
    async fn run(&self, request: &JudgeRequest) -> Result<JudgeResponse, JudgeError>;
}

/// Judge reached over HTTP
pub struct HttpJudgeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpJudgeClient {
    /// Build a client with a bounded per-request timeout
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self, JudgeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build a client from configuration; `None` when no judge URL is set
    pub fn from_config(config: &JudgeConfig) -> Result<Option<Self>, JudgeError> {
        match &config.url {
            Some(url) => Self::new(
                url.clone(),
                config.api_key.clone(),
                Duration::from_secs(config.timeout_seconds),
            )
            .map(Some),
            None => Ok(None),
        }
    }

    fn submissions_url(&self) -> String {
        format!("{}/submissions?base64_encoded=false&wait=true", self.base_url)
    }
}

#[async_trait]
impl Judge for HttpJudgeClient {
    async fn run(&self, request: &JudgeRequest) -> Result<JudgeResponse, JudgeError> {
        let mut builder = self.client.post(self.submissions_url()).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header(JUDGE_AUTH_HEADER, key);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(JudgeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<JudgeResponse>().await?)
    }
}
