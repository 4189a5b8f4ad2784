//! Configuration Loader
//!
//! Layered loading with the `config` crate: serialized defaults, then a TOML
//! file, then environment variables such as
//! `RPC_CONFORMANCE__RUNNER__MAX_IN_FLIGHT=4`.

use config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::HarnessConfig;
use crate::error::HarnessResult;

/// Looked up in the working directory when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "rpc-conformance.toml";
pub const ENV_PREFIX: &str = "RPC_CONFORMANCE";

impl HarnessConfig {
    /// Load defaults, `./rpc-conformance.toml` if present, and environment overrides
    pub fn load() -> HarnessResult<Self> {
        Self::build(None, None)
    }

    /// Load defaults, the given file (which must exist), and environment overrides
    pub fn load_from_file(path: &Path) -> HarnessResult<Self> {
        Self::build(Some(path), None)
    }

    /// `env` replaces the process environment when set, so tests stay isolated
    fn build(path: Option<&Path>, env: Option<HashMap<String, String>>) -> HarnessResult<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(CONFIG_FILE_NAME).required(false),
        };

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(env);

        let config: HarnessConfig = Config::builder()
            .add_source(Config::try_from(&HarnessConfig::default())?)
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!(?config, "Loaded harness configuration");
        Ok(config)
    }
}
