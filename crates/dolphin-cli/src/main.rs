#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod keygen;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use dolphin_core::{ModelService, ModelStatus};
use dolphin_server::handler::{CustomRoutes, fallback, mount, routes};
use dolphin_server::middleware::{
    RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt, RouterSecurityExt,
};
use dolphin_server::service::ServiceState;

use crate::config::{Cli, Command};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "dolphin_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "dolphin_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "dolphin_cli::config";

fn main() {
    let cli = Cli::init();
    Cli::init_tracing();

    let result = match cli.command.clone() {
        Some(Command::Keygen(args)) => keygen::run(&args),
        None => start(cli),
    };

    let Err(error) = result else {
        process::exit(0);
    };

    let message = format!("{error:#}");
    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %message,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {message}");
    }

    process::exit(1);
}

/// Builds the runtime and runs the server on it.
fn start(cli: Cli) -> anyhow::Result<()> {
    cli.validate()?;

    let runtime = cli
        .server
        .runtime()
        .context("failed to build the async runtime")?;

    runtime.block_on(run(cli))
}

/// Server entry point.
async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "Starting dolphin server"
    );
    cli.log();

    let model_config = cli.model.clone().resolve().await?;
    let model = model_config.create_model()?;
    if let Some(model) = &model {
        probe_model(model).await;
    }

    let state = ServiceState::from_config(&cli.service, model)
        .await
        .context("failed to create service state")?;
    let router = create_router(state, &cli);

    server::serve(router, cli.server).await?;
    Ok(())
}

/// Logs whether the model server answers; never fails startup.
async fn probe_model(model: &ModelService) {
    match model.health_check().await {
        Ok(health) if health.status == ModelStatus::Healthy => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_STARTUP,
                backend = model.name(),
                response_ms = health.response.map(|r| r.as_millis() as u64),
                "Model server is reachable"
            );
        }
        Ok(health) => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_STARTUP,
                backend = model.name(),
                status = ?health.status,
                message = health.message.as_deref().unwrap_or_default(),
                "Model server reported a problem"
            );
        }
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_STARTUP,
                backend = model.name(),
                error = %error,
                "Model server is not reachable yet"
            );
        }
    }
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS and body size limits
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, cli: &Cli) -> Router {
    let api_routes = mount(
        cli.service.root_path(),
        routes(CustomRoutes::new(), state.clone()),
    );

    api_routes
        .with_open_api(&cli.middleware.openapi)
        .fallback(fallback)
        .with_state(state)
        .with_security(&cli.middleware.cors, cli.service.max_upload_size)
        .with_observability()
        .with_recovery(&cli.middleware.recovery)
}
