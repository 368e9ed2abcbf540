//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig         # Host, port, workers, shutdown
//! ├── middleware: MiddlewareConfig # CORS, OpenAPI, request timeout
//! ├── service: ServiceConfig       # Root path, API keys, batch and upload limits
//! ├── model: ModelConfig           # Model server URL, name, credentials
//! └── command: Option<Command>     # `keygen`
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

mod middleware;
mod model;
mod server;

use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dolphin_server::service::ServiceConfig;
pub use middleware::MiddlewareConfig;
pub use model::{ModelConfig, ModelSettingsFile};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::keygen::KeygenArgs;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "dolphin")]
#[command(about = "Dolphin document parser server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, OpenAPI, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// API keys, batch and upload limits.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Model backend configuration.
    #[clap(flatten)]
    pub model: ModelConfig,

    /// Runs a utility instead of the server.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Utilities run instead of the server.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generates API keys.
    Keygen(KeygenArgs),
}

impl Cli {
    /// Loads `.env` files (if enabled) and parses CLI arguments.
    ///
    /// Files are loaded first so clap picks their values up as environment
    /// defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads `.env.local` and `.env` if the dotenv feature is enabled.
    ///
    /// Variables already set are kept, so `.env.local` wins over `.env`.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        for file in [".env.local", ".env"] {
            if let Err(err) = dotenvy::from_filename(file)
                && !err.not_found()
            {
                eprintln!("Warning: failed to load {file}: {err}");
            }
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to standard error so command output stays clean.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;
        Ok(())
    }

    /// Logs configuration (no secrets).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            root_path = %self.service.root_path,
            api_keys_file = ?self.service.api_keys_file,
            max_batch_size = self.service.max_batch_size,
            max_upload_size = self.service.max_upload_size,
            "Service configuration"
        );
    }

    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
