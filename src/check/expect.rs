//! Predicate builders for common response expectations.
//!
//! Paths are dotted (`info.version`); numeric segments index into arrays
//! (`categories.0.ID`). An empty path addresses the whole response.

use serde_json::Value;

use super::{Predicate, PredicateError, Verdict};

/// Resolve a dotted path inside a response value
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Accept every successful response
pub fn accept_any() -> Predicate {
    Predicate::new("any response", |_| Ok(Verdict::Accepted))
}

/// Require the field at `path` to equal `expected`
pub fn field_equals(path: impl Into<String>, expected: impl Into<Value>) -> Predicate {
    let path = path.into();
    let expected = expected.into();
    let description = format!("{path} == {expected}");

    Predicate::new(description, move |response| {
        let verdict = match lookup(response, &path) {
            Some(actual) if *actual == expected => Verdict::Accepted,
            Some(actual) => Verdict::reject(format!(
                "expected {{{path}: {expected}}}, got {{{path}: {actual}}}"
            )),
            None => Verdict::reject(format!(
                "expected {{{path}: {expected}}}, got no {path} field"
            )),
        };
        Ok(verdict)
    })
}

/// Require a field to be present (any value, including null)
pub fn field_present(path: impl Into<String>) -> Predicate {
    let path = path.into();
    let description = format!("{path} is present");

    Predicate::new(description, move |response| {
        if lookup(response, &path).is_some() {
            Ok(Verdict::Accepted)
        } else {
            Ok(Verdict::reject(format!(
                "expected field {path} to be present"
            )))
        }
    })
}

/// Require the value at `path` to be an array with at least one element
pub fn non_empty_array(path: impl Into<String>) -> Predicate {
    let path = path.into();
    let description = format!("{path} is a non-empty array");

    Predicate::new(description, move |response| {
        let verdict = match lookup(response, &path) {
            Some(Value::Array(items)) if !items.is_empty() => Verdict::Accepted,
            Some(Value::Array(_)) => {
                Verdict::reject(format!("expected {path} to be a non-empty array, got []"))
            }
            Some(other) => Verdict::reject(format!(
                "expected {path} to be a non-empty array, got {other}"
            )),
            None => Verdict::reject(format!(
                "expected {path} to be a non-empty array, got no {path} field"
            )),
        };
        Ok(verdict)
    })
}

/// Every predicate must accept; the first rejection or fault wins
pub fn all_of(predicates: Vec<Predicate>) -> Predicate {
    let description = predicates
        .iter()
        .map(Predicate::description)
        .collect::<Vec<_>>()
        .join(" && ");

    Predicate::new(description, move |response| {
        for predicate in &predicates {
            match predicate.evaluate(response)? {
                Verdict::Accepted => continue,
                rejected => return Ok(rejected),
            }
        }
        Ok(Verdict::Accepted)
    })
}

/// Wrap an infallible boolean test
pub fn satisfies<F>(description: impl Into<String>, test: F) -> Predicate
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    let description = description.into();
    let detail = format!("expected response to satisfy: {description}");

    Predicate::new(description, move |response| {
        if test(response) {
            Ok(Verdict::Accepted)
        } else {
            Ok(Verdict::reject(detail.clone()))
        }
    })
}

/// Wrap a fallible boolean test. `Err` means the test itself could not be
/// evaluated and is reported as a predicate fault, not a rejection.
pub fn try_satisfies<F>(description: impl Into<String>, test: F) -> Predicate
where
    F: Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
{
    let description = description.into();
    let detail = format!("expected response to satisfy: {description}");

    Predicate::new(description, move |response| match test(response) {
        Ok(true) => Ok(Verdict::Accepted),
        Ok(false) => Ok(Verdict::reject(detail.clone())),
        Err(message) => Err(PredicateError::Raised(message)),
    })
}
