//! # Built-in Suites
//!
//! Ready-made check lists for the category service. The status and category
//! suites cover the two manual smoke scripts; the smoke suite runs one check
//! per read operation.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

use crate::check::{expect, Check};
use crate::client::RpcClient;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::reference::{InMemoryCategoryService, STATUS_OK};
use crate::report::RunReport;
use crate::resilience::RetryingClient;
use crate::runner::ConformanceRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    Status,
    Categories,
    Smoke,
}

impl Suite {
    pub const ALL: [Suite; 3] = [Suite::Status, Suite::Categories, Suite::Smoke];

    pub fn checks(self) -> HarnessResult<Vec<Check>> {
        match self {
            Suite::Status => status_suite(),
            Suite::Categories => category_suite(),
            Suite::Smoke => smoke_suite(),
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suite::Status => write!(f, "status"),
            Suite::Categories => write!(f, "categories"),
            Suite::Smoke => write!(f, "smoke"),
        }
    }
}

impl FromStr for Suite {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "status" => Ok(Suite::Status),
            "categories" | "category" => Ok(Suite::Categories),
            "smoke" => Ok(Suite::Smoke),
            other => Err(HarnessError::unknown_variant("suite", other)),
        }
    }
}

pub fn status_check() -> HarnessResult<Check> {
    Check::new("getStatus", json!({}), expect::field_equals("status", STATUS_OK))
}

pub fn get_category_check(category_id: &str) -> HarnessResult<Check> {
    Check::new(
        "GetCategory",
        json!({ "categoryID": category_id }),
        expect::all_of(vec![
            expect::field_equals("ID", category_id),
            expect::field_present("name"),
        ]),
    )
}

pub fn list_categories_check() -> HarnessResult<Check> {
    Check::new(
        "ListCategories",
        json!({}),
        expect::non_empty_array("categories"),
    )
}

/// `getStatus({})` issued twice
pub fn status_suite() -> HarnessResult<Vec<Check>> {
    Ok(vec![status_check()?, status_check()?])
}

pub fn category_suite() -> HarnessResult<Vec<Check>> {
    Ok(vec![get_category_check("1")?, list_categories_check()?])
}

/// `getStatus`, `ListCategories`, `GetCategory`, in that order
pub fn smoke_suite() -> HarnessResult<Vec<Check>> {
    Ok(vec![
        status_check()?,
        list_categories_check()?,
        get_category_check("1")?,
    ])
}

/// Run `suite` against a freshly seeded reference service that reports
/// `status` from `GetStatus`. Runner and retry settings come from `config`.
pub async fn run_reference_suite(
    suite: Suite,
    status: &str,
    config: &HarnessConfig,
) -> HarnessResult<RunReport> {
    let checks = suite.checks()?;
    let service = InMemoryCategoryService::with_default_categories().with_status(status);
    let client: Box<dyn RpcClient> = if config.retry.enabled {
        Box::new(RetryingClient::new(service, config.retry.to_backoff_config()))
    } else {
        Box::new(service)
    };

    tracing::info!(suite = %suite, checks = checks.len(), status, "Running suite");
    ConformanceRunner::new(config.runner.to_runner_config())
        .run(&client, &checks)
        .await
}
