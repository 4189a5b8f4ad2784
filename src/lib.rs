#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # RPC Conformance
//!
//! A small harness that issues request/response checks against a remote
//! service through an injected client and reports a pass/fail outcome per
//! check.
//!
//! ## Overview
//!
//! A [`Check`] pairs an operation name and request with a predicate over the
//! response. The [`ConformanceRunner`] invokes each check's operation on a
//! caller-supplied [`RpcClient`], judges the response, and returns a
//! [`RunReport`] holding one [`CheckResult`] per check, in submission order.
//! Outcomes are [`Outcome::Passed`], [`Outcome::Failed`] (response rejected),
//! or [`Outcome::Errored`] (call failed, timed out, or the predicate faulted).
//!
//! ## Module Organization
//!
//! - [`client`] - The `RpcClient` capability and its error type
//! - [`check`] - Checks, predicates, and expectation builders
//! - [`runner`] - Sequential and concurrent execution
//! - [`report`] - Outcomes, results, and run reports
//! - [`reporter`] - Text and JSON rendering
//! - [`resilience`] - Opt-in retrying client wrapper
//! - [`reference`] - In-memory category service implementing `RpcClient`
//! - [`suites`] - Built-in check lists for the category service
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging
//! - [`error`] - Harness errors
//!
//! ## Quick Start
//!
//! ```rust
//! use rpc_conformance::reference::InMemoryCategoryService;
//! use rpc_conformance::{run, suites, Outcome};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = InMemoryCategoryService::with_default_categories();
//! let report = run(&client, &suites::smoke_suite()?).await?;
//!
//! assert_eq!(report.len(), 3);
//! assert!(report.iter().all(|result| result.outcome() == Outcome::Passed));
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod reference;
pub mod report;
pub mod reporter;
pub mod resilience;
pub mod runner;
pub mod suites;

pub use check::{expect, Check, Predicate, PredicateError, Verdict};
pub use client::{ClientError, ClientResult, RpcClient};
pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
pub use report::{CheckResult, Outcome, RunReport, RunSummary};
pub use reporter::{JsonReporter, ReportFormat, Reporter, TextReporter};
pub use runner::{run, ConformanceRunner, ExecutionMode, RunnerConfig};
