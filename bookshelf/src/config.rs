//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The file path
//! defaults to `config.yaml` and can be changed with the `-f` flag or the `BOOKSHELF_CONFIG`
//! environment variable. A missing file is not an error: every field has a default.
//!
//! ## Loading Priority
//!
//! 1. **YAML config file** - base configuration
//! 2. **Environment variables** - variables prefixed with `BOOKSHELF_` override YAML values
//!
//! Nested values use double underscores, e.g. `BOOKSHELF_STORAGE__PATH=/var/lib/bookshelf`.
//!
//! ## Example
//!
//! ```yaml
//! host: 127.0.0.1
//! port: 4000
//! books_path: /books
//! storage:
//!   type: local
//!   path: ./records
//! store_timeout: 30s
//! max_body_size: 1048576
//! expose_validation_reasons: true
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "BOOKSHELF_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,

    /// Print the OpenAPI document as JSON and exit.
    #[arg(long)]
    pub print_openapi: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Path that accepts book submissions
    pub books_path: String,
    /// Where validated records are written
    pub storage: StorageConfig,
    /// Upper bound on a single store write; slower writes answer 500
    #[serde(with = "humantime_serde")]
    pub store_timeout: Duration,
    /// Largest accepted request body, in bytes
    pub max_body_size: usize,
    /// Include the validation reason in 400 responses
    pub expose_validation_reasons: bool,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

/// Record storage backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// One file per record under `path`
    Local { path: PathBuf },
    /// Keep records in process memory
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local {
            path: PathBuf::from("./records"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            books_path: "/books".to_string(),
            storage: StorageConfig::default(),
            store_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024,
            expose_validation_reasons: true,
            enable_otel_export: false,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.books_path.starts_with('/') || self.books_path == "/" {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: books_path must be an absolute path below the root, got {:?}",
                    self.books_path
                ),
            });
        }

        if self.store_timeout.is_zero() {
            return Err(Error::Internal {
                operation: "Config validation: store_timeout must be greater than zero".to_string(),
            });
        }

        if self.max_body_size == 0 {
            return Err(Error::Internal {
                operation: "Config validation: max_body_size must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            // BOOKSHELF_CONFIG names the file itself and is not a config key
            .merge(Env::prefixed("BOOKSHELF_").ignore(&["config"]).split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
