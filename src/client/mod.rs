//! # Client Capability
//!
//! The harness never constructs a transport. Callers pass in anything that
//! implements [`RpcClient`]: a generated gRPC stub wrapper, an HTTP adapter,
//! the in-process [`InMemoryCategoryService`](crate::reference::InMemoryCategoryService),
//! or a scripted test double.
//!
//! ## Usage
//!
//! ```rust
//! use async_trait::async_trait;
//! use rpc_conformance::client::{ClientError, ClientResult, RpcClient};
//! use serde_json::{json, Value};
//!
//! struct StatusOnly;
//!
//! #[async_trait]
//! impl RpcClient for StatusOnly {
//!     fn transport_name(&self) -> &'static str {
//!         "static"
//!     }
//!
//!     async fn invoke(&self, operation: &str, _request: Value) -> ClientResult<Value> {
//!         match operation {
//!             "getStatus" => Ok(json!({ "status": "OK" })),
//!             other => Err(ClientError::unknown_operation(other)),
//!         }
//!     }
//! }
//! ```

pub mod error;
pub mod traits;

pub use error::{ClientError, ClientResult};
pub use traits::RpcClient;
