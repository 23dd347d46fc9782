//! Sequential evaluation runner.
//!
//! The runner feeds queries to the agent one at a time, hands each complete
//! output to the matching engine, and aggregates the verdicts. The
//! inter-case delay respects external rate limits; it is scheduling policy
//! here, the engine itself carries no ordering requirement.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::{sleep, timeout, Instant};

use stridecheck_core::{Evaluator, MatchVerdict, TestCase};

use crate::providers::AgentProvider;

/// Errors from the runner.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("No case with id {0}")]
    UnknownCase(u32),

    #[error("Invalid delay '{input}': {reason}")]
    InvalidDelay { input: String, reason: String },

    #[error("Failed to persist results: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Pause between consecutive agent invocations.
    pub delay: Duration,

    /// Upper bound for one agent invocation.
    pub request_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            request_timeout: Duration::from_secs(600),
        }
    }
}

impl RunnerConfig {
    /// Set the delay from a human-readable duration such as "5s" or "500ms".
    pub fn with_delay_str(mut self, delay: &str) -> Result<Self, RunnerError> {
        self.delay = humantime::parse_duration(delay).map_err(|e| RunnerError::InvalidDelay {
            input: delay.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self)
    }
}

/// The record persisted per case: invocation metadata plus the verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub case_id: u32,
    pub category: String,
    pub query: String,

    /// The agent's full output; `None` when invocation failed.
    pub output: Option<String>,

    pub duration_ms: u64,

    /// Invocation failure message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub verdict: MatchVerdict,
}

/// Aggregate counts over one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub hard_constraint_passed: usize,
    pub reference_matched: usize,
    pub needs_verification: usize,
    pub invocation_errors: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[CaseReport]) -> Self {
        Self {
            total: reports.len(),
            hard_constraint_passed: reports
                .iter()
                .filter(|r| r.verdict.hard_constraint_pass)
                .count(),
            reference_matched: reports.iter().filter(|r| !r.verdict.matches.is_empty()).count(),
            needs_verification: reports
                .iter()
                .filter(|r| !r.verdict.needs_verification.is_empty())
                .count(),
            invocation_errors: reports.iter().filter(|r| r.error.is_some()).count(),
        }
    }
}

/// Sequential runner over a case set.
pub struct Runner {
    provider: Arc<dyn AgentProvider>,
    evaluator: Evaluator,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(provider: Arc<dyn AgentProvider>, config: RunnerConfig) -> Self {
        Self {
            provider,
            evaluator: Evaluator::new(),
            config,
        }
    }

    /// Use a non-default evaluator (custom lexicon).
    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Run every case in order, delaying between invocations.
    pub async fn run_all(&self, cases: &[TestCase]) -> Vec<CaseReport> {
        let mut reports = Vec::with_capacity(cases.len());

        for (index, case) in cases.iter().enumerate() {
            tracing::info!(
                case_id = case.id,
                category = %case.category,
                provider = self.provider.name(),
                "running case"
            );
            reports.push(self.run_case(case).await);

            if index + 1 < cases.len() && !self.config.delay.is_zero() {
                tracing::debug!(delay = ?self.config.delay, "waiting before next case");
                sleep(self.config.delay).await;
            }
        }

        reports
    }

    /// Run the single case with the given id.
    pub async fn run_one(&self, cases: &[TestCase], id: u32) -> Result<CaseReport, RunnerError> {
        let case = cases
            .iter()
            .find(|c| c.id == id)
            .ok_or(RunnerError::UnknownCase(id))?;
        Ok(self.run_case(case).await)
    }

    /// Invoke the agent for one case and score the result.
    ///
    /// Invocation failures never abort a run: they are recorded as
    /// failure-shaped reports and the next case proceeds.
    async fn run_case(&self, case: &TestCase) -> CaseReport {
        let started = Instant::now();

        let outcome = match timeout(self.config.request_timeout, self.provider.run(&case.query))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(crate::providers::AgentError::Timeout(
                self.config.request_timeout,
            )),
        };

        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(output) => {
                let verdict = self.evaluator.evaluate(Some(&output), case);
                CaseReport {
                    case_id: case.id,
                    category: case.category.clone(),
                    query: case.query.clone(),
                    output: Some(output),
                    duration_ms,
                    error: None,
                    verdict,
                }
            }
            Err(err) => {
                tracing::warn!(case_id = case.id, error = %err, "agent invocation failed");
                let mut verdict = MatchVerdict::passing(case.id);
                verdict.hard_constraint_pass = false;
                verdict
                    .violations
                    .push(format!("agent invocation failed: {}", err));

                CaseReport {
                    case_id: case.id,
                    category: case.category.clone(),
                    query: case.query.clone(),
                    output: None,
                    duration_ms,
                    error: Some(err.to_string()),
                    verdict,
                }
            }
        }
    }

    /// Write the reports as a timestamped JSON array under `dir`.
    ///
    /// Returns the path of the written file.
    pub fn persist(reports: &[CaseReport], dir: impl AsRef<Path>) -> Result<PathBuf, RunnerError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let path = dir.join(format!("eval_{}.json", Utc::now().timestamp_millis()));
        std::fs::write(&path, serde_json::to_string_pretty(reports)?)?;

        tracing::info!(path = %path.display(), "results persisted");
        Ok(path)
    }
}
