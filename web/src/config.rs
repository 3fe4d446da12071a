//! # Configuration
//!
//! Server settings come from, in order of precedence: command line flags
//! (each with an `OASPROBE_*` environment fallback), an optional YAML file
//! given with `--config`, and built-in defaults.

use clap::Parser;
use derive_more::{Display, From};
use oasprobe_core::runner::{DEFAULT_MAX_BODY_BYTES, DEFAULT_TIMEOUT_SECS};
use oasprobe_core::RunnerConfig;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Errors raised while assembling the configuration.
#[derive(Debug, Display, From)]
pub enum ConfigError {
    /// The config file could not be read.
    #[display("cannot read config file: {_0}")]
    Io(std::io::Error),

    /// The config file is not valid YAML for [`AppConfig`].
    #[display("invalid config file: {_0}")]
    Parse(serde_yaml::Error),

    /// A setting is out of range.
    #[from(ignore)]
    #[display("invalid configuration: {_0}")]
    Invalid(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for ConfigError {}

/// Command line flags of the server binary.
#[derive(Parser, Debug, Default)]
#[clap(author, version, about = "OpenAPI endpoint catalog and test runner")]
pub struct Args {
    /// YAML configuration file.
    #[clap(long, env = "OASPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on.
    #[clap(long, env = "OASPROBE_BIND")]
    pub bind: Option<String>,

    /// SQLite database path (`:memory:` for a throwaway store).
    #[clap(long, env = "OASPROBE_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections.
    #[clap(long, env = "OASPROBE_POOL_SIZE")]
    pub pool_size: Option<u32>,

    /// Timeout for endpoint test requests, in seconds.
    #[clap(long, env = "OASPROBE_TEST_TIMEOUT_SECS")]
    pub test_timeout_secs: Option<u64>,

    /// Response bodies captured by test runs are cut at this many bytes.
    #[clap(long, env = "OASPROBE_MAX_RESPONSE_BYTES")]
    pub max_response_bytes: Option<usize>,

    /// Maximum accepted upload or JSON request size in bytes.
    #[clap(long, env = "OASPROBE_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// `env_logger` filter directive, e.g. `info` or `oasprobe_core=debug`.
    #[clap(long, env = "OASPROBE_LOG")]
    pub log_filter: Option<String>,
}

/// Effective server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Address to listen on.
    pub bind: String,
    /// SQLite database path.
    pub database_url: String,
    /// Maximum pooled database connections.
    pub pool_size: u32,
    /// Test request timeout in seconds.
    pub test_timeout_secs: u64,
    /// Captured response body limit.
    pub max_response_bytes: usize,
    /// Upload and JSON body limit.
    pub max_upload_bytes: usize,
    /// Log filter directive.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            database_url: "oasprobe.sqlite3".to_string(),
            pool_size: 8,
            test_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_response_bytes: DEFAULT_MAX_BODY_BYTES,
            max_upload_bytes: 10 * 1024 * 1024,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolves the configuration for `args`.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => serde_yaml::from_str(&fs::read_to_string(path)?)?,
            None => AppConfig::default(),
        };

        if let Some(bind) = &args.bind {
            config.bind = bind.clone();
        }
        if let Some(url) = &args.database_url {
            config.database_url = url.clone();
        }
        if let Some(size) = args.pool_size {
            config.pool_size = size;
        }
        if let Some(secs) = args.test_timeout_secs {
            config.test_timeout_secs = secs;
        }
        if let Some(bytes) = args.max_response_bytes {
            config.max_response_bytes = bytes;
        }
        if let Some(bytes) = args.max_upload_bytes {
            config.max_upload_bytes = bytes;
        }
        if let Some(filter) = &args.log_filter {
            config.log_filter = filter.clone();
        }

        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid("pool_size must be at least 1".into()));
        }
        if self.test_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "test_timeout_secs must be at least 1".into(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_bytes must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Test runner limits derived from this configuration.
    pub fn runner(&self) -> RunnerConfig {
        RunnerConfig {
            timeout: Duration::from_secs(self.test_timeout_secs),
            max_body_bytes: self.max_response_bytes,
        }
    }
}
