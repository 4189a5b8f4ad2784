//! Scripted Client Implementation for Testing
//!
//! Provides an `RpcClient` whose replies are scripted per operation and
//! request, with optional per-call delays, a call log, and in-flight
//! tracking for concurrency assertions.

use async_trait::async_trait;
use rpc_conformance::client::{ClientError, ClientResult, RpcClient};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted behavior for one (operation, request) pair
#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(Value),
    NotFound { resource: String, id: String },
    Transport(String),
    Fault(u16, String),
    /// Never completes
    Hang,
    Panic(String),
}

#[derive(Debug, Clone)]
struct Entry {
    behavior: Scripted,
    delay: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct ScriptedClient {
    exact: HashMap<String, Entry>,
    by_operation: HashMap<String, Entry>,
    calls: Mutex<Vec<(String, Value)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

fn key(operation: &str, request: &Value) -> String {
    format!("{operation} {request}")
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a reply for one exact request
    pub fn on(mut self, operation: &str, request: Value, behavior: Scripted) -> Self {
        self.exact.insert(
            key(operation, &request),
            Entry {
                behavior,
                delay: None,
            },
        );
        self
    }

    /// Script a delayed reply for one exact request
    pub fn on_delayed(
        mut self,
        operation: &str,
        request: Value,
        behavior: Scripted,
        delay: Duration,
    ) -> Self {
        self.exact.insert(
            key(operation, &request),
            Entry {
                behavior,
                delay: Some(delay),
            },
        );
        self
    }

    /// Script a reply for any request to `operation`
    pub fn on_any(mut self, operation: &str, behavior: Scripted, delay: Option<Duration>) -> Self {
        self.by_operation
            .insert(operation.to_string(), Entry { behavior, delay });
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RpcClient for ScriptedClient {
    fn transport_name(&self) -> &'static str {
        "scripted"
    }

    async fn invoke(&self, operation: &str, request: Value) -> ClientResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((operation.to_string(), request.clone()));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        let entry = self
            .exact
            .get(&key(operation, &request))
            .or_else(|| self.by_operation.get(operation))
            .cloned()
            .ok_or_else(|| ClientError::unknown_operation(operation))?;

        if let Some(delay) = entry.delay {
            tokio::time::sleep(delay).await;
        }

        match entry.behavior {
            Scripted::Reply(value) => Ok(value),
            Scripted::NotFound { resource, id } => Err(ClientError::not_found(resource, id)),
            Scripted::Transport(message) => Err(ClientError::transport(message)),
            Scripted::Fault(code, message) => Err(ClientError::server_fault(code, message)),
            Scripted::Hang => std::future::pending().await,
            Scripted::Panic(message) => panic!("{message}"),
        }
    }
}
