//! # Harness Configuration
//!
//! Runner, retry, and output settings. Values are layered: built-in defaults,
//! then an optional `rpc-conformance.toml`, then `RPC_CONFORMANCE__*`
//! environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rpc_conformance::config::HarnessConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarnessConfig::load()?;
//! let runner_config = config.runner.to_runner_config();
//! println!("mode: {:?}, in flight: {}", runner_config.mode, runner_config.max_in_flight);
//! # Ok(())
//! # }
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{HarnessError, HarnessResult};
use crate::reporter::ReportFormat;
use crate::resilience::BackoffConfig;
use crate::runner::{ExecutionMode, RunnerConfig};

pub use loader::{CONFIG_FILE_NAME, ENV_PREFIX};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub runner: RunnerSettings,
    pub retry: RetrySettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    pub mode: ExecutionMode,
    pub max_in_flight: usize,
    /// Per-call deadline in milliseconds; 0 disables the deadline
    pub call_timeout_ms: u64,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Concurrent,
            max_in_flight: 8,
            call_timeout_ms: 30_000,
        }
    }
}

impl RunnerSettings {
    pub fn to_runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            mode: self.mode,
            max_in_flight: self.max_in_flight,
            call_timeout: (self.call_timeout_ms > 0)
                .then(|| Duration::from_millis(self.call_timeout_ms)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub enabled: bool,
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: 3,
            initial_delay_ms: 100,
            multiplier: 2.0,
            max_delay_ms: 5_000,
        }
    }
}

impl RetrySettings {
    pub fn to_backoff_config(&self) -> BackoffConfig {
        BackoffConfig {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            multiplier: self.multiplier,
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: ReportFormat,
    pub verbose: bool,
}

impl HarnessConfig {
    pub fn validate(&self) -> HarnessResult<()> {
        if self.runner.max_in_flight == 0 {
            return Err(HarnessError::configuration(
                "runner.max_in_flight must be at least 1",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(HarnessError::configuration(
                "retry.max_attempts must be at least 1",
            ));
        }
        if !self.retry.multiplier.is_finite() || self.retry.multiplier < 1.0 {
            return Err(HarnessError::configuration(format!(
                "retry.multiplier must be a finite value >= 1.0, got {}",
                self.retry.multiplier
            )));
        }
        Ok(())
    }
}

/// Command-line style overrides applied on top of a loaded configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub format: Option<String>,
    pub mode: Option<String>,
    pub call_timeout_ms: Option<u64>,
    pub verbose: bool,
}

impl ConfigOverrides {
    /// Apply every set override, then re-validate
    pub fn apply(&self, config: &mut HarnessConfig) -> HarnessResult<()> {
        if let Some(format) = &self.format {
            config.output.format = format.parse()?;
        }
        if let Some(mode) = &self.mode {
            config.runner.mode = mode.parse()?;
        }
        if let Some(call_timeout_ms) = self.call_timeout_ms {
            config.runner.call_timeout_ms = call_timeout_ms;
        }
        if self.verbose {
            config.output.verbose = true;
        }
        config.validate()
    }
}
