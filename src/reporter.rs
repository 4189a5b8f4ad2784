//! # Reporters
//!
//! Render a [`RunReport`] for people or machines. The runner never prints;
//! presentation lives here.

use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

use crate::error::{HarnessError, HarnessResult};
use crate::report::{Outcome, RunReport};

pub trait Reporter: Send + Sync {
    fn render(&self, report: &RunReport) -> HarnessResult<String>;
}

/// Console lines in the shape of the manual smoke scripts:
///
/// ```text
/// Ran getStatus({})
/// PASS
/// Ran getStatus({})
/// FAIL: expected {status: "OK"}, got {status: "DOWN"}
/// 2 checks: 1 passed, 1 failed, 0 errored
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReporter {
    /// Also print each received response
    pub verbose: bool,
}

impl TextReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for TextReporter {
    fn render(&self, report: &RunReport) -> HarnessResult<String> {
        let mut out = String::new();

        for result in report {
            writeln!(out, "Ran {}", result.label()).map_err(fmt_error)?;

            if self.verbose {
                if let Some(response) = result.response() {
                    writeln!(out, " {response}").map_err(fmt_error)?;
                }
            }

            match (result.outcome(), result.failure_detail()) {
                (Outcome::Passed, _) | (_, None) => {
                    writeln!(out, "{}", result.outcome()).map_err(fmt_error)?;
                }
                (outcome, Some(detail)) => {
                    writeln!(out, "{outcome}: {detail}").map_err(fmt_error)?;
                }
            }
        }

        writeln!(out, "{}", report.summary()).map_err(fmt_error)?;
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter {
    pub pretty: bool,
}

impl Reporter for JsonReporter {
    fn render(&self, report: &RunReport) -> HarnessResult<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(rendered)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn reporter(self, verbose: bool) -> Box<dyn Reporter> {
        match self {
            ReportFormat::Text => Box::new(TextReporter::new(verbose)),
            ReportFormat::Json => Box::new(JsonReporter { pretty: true }),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(HarnessError::unknown_variant("report format", other)),
        }
    }
}

fn fmt_error(error: std::fmt::Error) -> HarnessError {
    HarnessError::Internal(format!("failed to render report: {error}"))
}
