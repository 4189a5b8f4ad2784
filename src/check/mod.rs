//! # Checks
//!
//! A [`Check`] names one remote operation, the request to send it, and the
//! [`Predicate`] its response must satisfy. Checks are built up front and
//! never mutated; the runner only reads them.

pub mod expect;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::error::{HarnessError, HarnessResult};

/// Result of evaluating a predicate that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// The response arrived but did not meet the expectation
    Rejected(String),
}

impl Verdict {
    pub fn reject(detail: impl Into<String>) -> Self {
        Self::Rejected(detail.into())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// The expectation logic itself faulted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("predicate raised: {0}")]
    Raised(String),

    #[error("predicate panicked: {0}")]
    Panicked(String),
}

type PredicateFn = dyn Fn(&Value) -> Result<Verdict, PredicateError> + Send + Sync;

/// Shareable expectation over a successful response value
#[derive(Clone)]
pub struct Predicate {
    description: String,
    func: Arc<PredicateFn>,
}

impl Predicate {
    pub fn new<F>(description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Verdict, PredicateError> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            func: Arc::new(func),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Evaluate against a response. Panics are not caught here; the runner
    /// isolates them.
    pub fn evaluate(&self, response: &Value) -> Result<Verdict, PredicateError> {
        (self.func)(response)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A single named remote-operation test case
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    label: String,
    operation: String,
    request: Value,
    #[serde(skip)]
    predicate: Predicate,
}

impl Check {
    /// Build a check. The label defaults to `operation(request)`, e.g.
    /// `getStatus({})`.
    pub fn new(
        operation: impl Into<String>,
        request: Value,
        predicate: Predicate,
    ) -> HarnessResult<Self> {
        let operation = operation.into();
        if operation.trim().is_empty() {
            return Err(HarnessError::invalid_check(
                "operation name must not be empty",
            ));
        }

        let label = format!("{operation}({request})");
        Ok(Self {
            label,
            operation,
            request,
            predicate,
        })
    }

    /// Replace the reporting label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn request(&self) -> &Value {
        &self.request
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_label_mirrors_call_shape() {
        let check = Check::new("getStatus", json!({}), expect::accept_any()).unwrap();
        assert_eq!(check.label(), "getStatus({})");

        let check = Check::new(
            "GetCategory",
            json!({ "categoryID": "1" }),
            expect::accept_any(),
        )
        .unwrap();
        assert_eq!(check.label(), r#"GetCategory({"categoryID":"1"})"#);
    }

    #[test]
    fn test_with_label_overrides() {
        let check = Check::new("getStatus", json!({}), expect::accept_any())
            .unwrap()
            .with_label("status is up");
        assert_eq!(check.label(), "status is up");
        assert_eq!(check.operation(), "getStatus");
    }

    #[test]
    fn test_empty_operation_rejected() {
        for name in ["", "   "] {
            let result = Check::new(name, json!({}), expect::accept_any());
            assert!(matches!(result, Err(HarnessError::InvalidCheck(_))));
        }
    }

    #[test]
    fn test_serializes_without_predicate() {
        let check = Check::new("ListCategories", json!({}), expect::accept_any()).unwrap();
        let value = serde_json::to_value(&check).unwrap();
        assert_eq!(
            value,
            json!({
                "label": "ListCategories({})",
                "operation": "ListCategories",
                "request": {}
            })
        );
    }

    #[test]
    fn test_predicate_debug_shows_description() {
        let predicate = expect::field_equals("status", "OK");
        let rendered = format!("{predicate:?}");
        assert!(rendered.contains(r#"description: "status == \"OK\"""#));
        assert_eq!(predicate.description(), r#"status == "OK""#);
    }
}
