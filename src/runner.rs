//! # Conformance Runner
//!
//! Executes a sequence of [`Check`]s against an injected [`RpcClient`] and
//! produces a [`RunReport`] with exactly one result per check, in submission
//! order.
//!
//! In concurrent mode completions arrive in any order. Every in-flight future
//! carries the index of the check it was issued for, and its result is
//! written into that slot, so attribution never depends on arrival order.
//!
//! A failing check never stops the run: invocation failures, timeouts,
//! rejected responses, predicate faults, and panics inside the client or the
//! predicate are all captured as outcomes.
//!
//! The runner writes nothing itself; its only output is `tracing` events.
//! Caught panics still pass through the process panic hook, which prints to
//! stderr by default. Embedders that want silence install their own hook, as
//! the CLI does with [`route_panics_to_tracing`](crate::logging::route_panics_to_tracing).

use chrono::Utc;
use futures::{stream, FutureExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::check::{Check, PredicateError, Verdict};
use crate::client::{ClientError, RpcClient};
use crate::error::{HarnessError, HarnessResult};
use crate::logging::{log_check_outcome, log_run_summary};
use crate::report::{CheckResult, RunReport};

/// How checks are issued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One check at a time, in order
    Sequential,
    /// Up to `max_in_flight` checks outstanding at once
    #[default]
    Concurrent,
}

impl FromStr for ExecutionMode {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            other => Err(HarnessError::unknown_variant("execution mode", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub mode: ExecutionMode,
    /// Ignored in sequential mode; 0 behaves as 1
    pub max_in_flight: usize,
    /// Per-invocation deadline; `None` waits indefinitely
    pub call_timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Concurrent,
            max_in_flight: 8,
            call_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl RunnerConfig {
    pub fn sequential() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            ..Self::default()
        }
    }

    pub fn concurrent(max_in_flight: usize) -> Self {
        Self {
            mode: ExecutionMode::Concurrent,
            max_in_flight,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConformanceRunner {
    config: RunnerConfig,
}

impl ConformanceRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every check and report the outcomes in check order.
    ///
    /// Returns `Err` only when `checks` is empty; per-check failures are
    /// recorded in the report.
    pub async fn run<C>(&self, client: &C, checks: &[Check]) -> HarnessResult<RunReport>
    where
        C: RpcClient + ?Sized,
    {
        if checks.is_empty() {
            return Err(HarnessError::EmptyCheckList);
        }

        let started_at = Utc::now();
        let start = Instant::now();

        info!(
            checks = checks.len(),
            mode = ?self.config.mode,
            transport = client.transport_name(),
            "Starting conformance run"
        );

        let results = match self.config.mode {
            ExecutionMode::Sequential => {
                let mut results = Vec::with_capacity(checks.len());
                for (index, check) in checks.iter().enumerate() {
                    results.push(self.execute(client, index, check).await);
                }
                results
            }
            ExecutionMode::Concurrent => self.run_concurrent(client, checks).await?,
        };

        let report = RunReport::new(
            started_at,
            elapsed_ms(start),
            self.config.mode,
            results,
        );
        log_run_summary(&report);
        Ok(report)
    }

    async fn run_concurrent<C>(&self, client: &C, checks: &[Check]) -> HarnessResult<Vec<CheckResult>>
    where
        C: RpcClient + ?Sized,
    {
        let limit = self.config.max_in_flight.max(1);
        let mut slots: Vec<Option<CheckResult>> = checks.iter().map(|_| None).collect();

        let mut completions = stream::iter(checks.iter().enumerate())
            .map(move |(index, check)| async move { (index, self.execute(client, index, check).await) })
            .buffer_unordered(limit);

        while let Some((index, result)) = completions.next().await {
            debug!(index, "Check completed");
            slots[index] = Some(result);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    HarnessError::Internal(format!("no completion recorded for check {index}"))
                })
            })
            .collect()
    }

    async fn execute<C>(&self, client: &C, index: usize, check: &Check) -> CheckResult
    where
        C: RpcClient + ?Sized,
    {
        let start = Instant::now();
        debug!(
            index,
            operation = %check.operation(),
            transport = client.transport_name(),
            "Invoking operation"
        );

        // Building the future happens inside the guarded block so a client that
        // panics before returning its future is isolated as well
        let invocation = AssertUnwindSafe(async {
            client
                .invoke(check.operation(), check.request().clone())
                .await
        })
        .catch_unwind();

        let completion = match self.config.call_timeout {
            Some(timeout) => tokio::time::timeout(timeout, invocation)
                .await
                .map_err(|_| ClientError::Timeout {
                    operation: check.operation().to_string(),
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            None => Ok(invocation.await),
        };

        let result = match completion {
            Err(timeout_error) => {
                CheckResult::errored(index, check.clone(), timeout_error.to_string(), elapsed_ms(start))
            }
            Ok(Err(panic_payload)) => CheckResult::errored(
                index,
                check.clone(),
                format!("client panicked: {}", panic_message(panic_payload.as_ref())),
                elapsed_ms(start),
            ),
            Ok(Ok(Err(client_error))) => {
                CheckResult::errored(index, check.clone(), client_error.to_string(), elapsed_ms(start))
            }
            Ok(Ok(Ok(response))) => judge(index, check, response, start),
        };

        log_check_outcome(&result);
        result
    }
}

/// Run `checks` against `client` with the default configuration
pub async fn run<C>(client: &C, checks: &[Check]) -> HarnessResult<RunReport>
where
    C: RpcClient + ?Sized,
{
    ConformanceRunner::default().run(client, checks).await
}

fn judge(index: usize, check: &Check, response: Value, start: Instant) -> CheckResult {
    let evaluation = panic::catch_unwind(AssertUnwindSafe(|| check.predicate().evaluate(&response)));
    let elapsed = elapsed_ms(start);

    match evaluation {
        Ok(Ok(Verdict::Accepted)) => CheckResult::passed(index, check.clone(), response, elapsed),
        Ok(Ok(Verdict::Rejected(detail))) => {
            CheckResult::failed(index, check.clone(), response, detail, elapsed)
        }
        Ok(Err(predicate_error)) => CheckResult::errored_with_response(
            index,
            check.clone(),
            response,
            predicate_error.to_string(),
            elapsed,
        ),
        Err(panic_payload) => {
            let error = PredicateError::Panicked(panic_message(panic_payload.as_ref()));
            CheckResult::errored_with_response(index, check.clone(), response, error.to_string(), elapsed)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
