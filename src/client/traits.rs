//! # RPC Client Capability
//!
//! The single seam between the harness and whatever transport reaches the
//! service under test. Implementations own addressing, schema, and
//! authentication; the harness only names an operation and hands over a
//! request value.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::error::ClientResult;

/// Named remote-operation invocation.
///
/// One call yields exactly one completion: the response value or the
/// failure cause.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Get the transport name for debugging/logging.
    fn transport_name(&self) -> &'static str;

    /// Invoke `operation` with `request` and wait for its completion.
    async fn invoke(&self, operation: &str, request: Value) -> ClientResult<Value>;
}

#[async_trait]
impl<C: RpcClient + ?Sized> RpcClient for Arc<C> {
    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }

    async fn invoke(&self, operation: &str, request: Value) -> ClientResult<Value> {
        (**self).invoke(operation, request).await
    }
}

#[async_trait]
impl<C: RpcClient + ?Sized> RpcClient for Box<C> {
    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }

    async fn invoke(&self, operation: &str, request: Value) -> ClientResult<Value> {
        (**self).invoke(operation, request).await
    }
}
