//! # Resilience Module
//!
//! Retry policy for flaky transports. The runner never retries on its own;
//! callers opt in by wrapping their client in a [`RetryingClient`] before
//! handing it to the runner.
//!
//! ## Usage
//!
//! ```rust
//! use rpc_conformance::reference::InMemoryCategoryService;
//! use rpc_conformance::resilience::{BackoffConfig, RetryingClient};
//!
//! let client = RetryingClient::new(
//!     InMemoryCategoryService::with_default_categories(),
//!     BackoffConfig::default(),
//! );
//! assert_eq!(client.backoff().max_attempts, 3);
//! ```

pub mod retry;

pub use retry::{BackoffConfig, RetryingClient};
