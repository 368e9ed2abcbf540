//! Middleware configuration for the HTTP server.
//!
//! ```bash
//! dolphin --cors-origins "https://example.com" --request-timeout 60
//! ```

use clap::Args;
use dolphin_server::middleware::{CorsConfig, OpenApiConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration combining CORS, OpenAPI and recovery settings.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Allowed origins and credential policy.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Paths of the OpenAPI document and Scalar UI.
    #[clap(flatten)]
    pub openapi: OpenApiConfig,

    /// Request timeout.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            openapi_path = %self.openapi.open_api_json,
            scalar_path = %self.openapi.scalar_ui,
            request_timeout_secs = self.recovery.request_timeout,
            "Middleware configuration"
        );
    }
}
