//! # Run Reports
//!
//! One [`CheckResult`] per executed check, collected into a [`RunReport`] in
//! the order the checks were supplied.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::check::Check;
use crate::runner::ExecutionMode;

/// Terminal state of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Errored,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "PASS"),
            Outcome::Failed => write!(f, "FAIL"),
            Outcome::Errored => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    index: usize,
    check: Check,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_detail: Option<String>,
    elapsed_ms: u64,
}

impl CheckResult {
    pub fn passed(index: usize, check: Check, response: Value, elapsed_ms: u64) -> Self {
        Self {
            index,
            check,
            outcome: Outcome::Passed,
            response: Some(response),
            failure_detail: None,
            elapsed_ms,
        }
    }

    pub fn failed(
        index: usize,
        check: Check,
        response: Value,
        detail: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            index,
            check,
            outcome: Outcome::Failed,
            response: Some(response),
            failure_detail: Some(non_empty_detail(detail.into(), Outcome::Failed)),
            elapsed_ms,
        }
    }

    /// The invocation itself failed; there is no response to keep
    pub fn errored(index: usize, check: Check, cause: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            index,
            check,
            outcome: Outcome::Errored,
            response: None,
            failure_detail: Some(non_empty_detail(cause.into(), Outcome::Errored)),
            elapsed_ms,
        }
    }

    /// A response arrived but the predicate faulted while judging it
    pub fn errored_with_response(
        index: usize,
        check: Check,
        response: Value,
        cause: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            response: Some(response),
            ..Self::errored(index, check, cause, elapsed_ms)
        }
    }

    /// Position of the originating check in the submitted sequence
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    pub fn label(&self) -> &str {
        self.check.label()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    pub fn failure_detail(&self) -> Option<&str> {
        self.failure_detail.as_deref()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

fn non_empty_detail(detail: String, outcome: Outcome) -> String {
    if detail.trim().is_empty() {
        format!("{outcome} without detail")
    } else {
        detail
    }
}

/// Outcome counts for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} checks: {} passed, {} failed, {} errored",
            self.total, self.passed, self.failed, self.errored
        )
    }
}

/// Ordered outcomes for a batch of checks
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    duration_ms: u64,
    mode: ExecutionMode,
    summary: RunSummary,
    results: Vec<CheckResult>,
}

impl RunReport {
    pub(crate) fn new(
        started_at: DateTime<Utc>,
        duration_ms: u64,
        mode: ExecutionMode,
        results: Vec<CheckResult>,
    ) -> Self {
        let summary = summarize(&results);
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            duration_ms,
            mode,
            summary,
            results,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CheckResult> {
        self.results.iter()
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn all_passed(&self) -> bool {
        self.summary.passed == self.summary.total
    }

    /// `(label, outcome)` pairs in check order, for comparing runs
    pub fn outcomes(&self) -> Vec<(String, Outcome)> {
        self.results
            .iter()
            .map(|result| (result.label().to_string(), result.outcome()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a RunReport {
    type Item = &'a CheckResult;
    type IntoIter = std::slice::Iter<'a, CheckResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

fn summarize(results: &[CheckResult]) -> RunSummary {
    results
        .iter()
        .fold(
            RunSummary {
                total: results.len(),
                ..RunSummary::default()
            },
            |mut summary, result| {
                match result.outcome() {
                    Outcome::Passed => summary.passed += 1,
                    Outcome::Failed => summary.failed += 1,
                    Outcome::Errored => summary.errored += 1,
                }
                summary
            },
        )
}
