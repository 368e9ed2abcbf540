//! Service description and liveness handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::response::{HealthResponse, RootResponse};
use crate::service::{ParserHandle, ServiceState};

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "dolphin_server::handler::monitors";

/// Describes the service and its endpoints.
async fn root() -> (StatusCode, Json<RootResponse>) {
    (StatusCode::OK, Json(RootResponse::default()))
}

fn root_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Describe the service")
        .description("Returns the service name, version and endpoint list.")
        .response::<200, Json<RootResponse>>()
}

/// Reports liveness and whether a model is configured.
#[tracing::instrument(skip_all)]
async fn health(State(handle): State<ParserHandle>) -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse::new(handle.is_loaded());

    tracing::debug!(
        target: TRACING_TARGET,
        model_loaded = response.model_loaded,
        "Health status requested"
    );

    (StatusCode::OK, Json(response))
}

fn health_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get health status")
        .description("Always answers while the process is up; `model_loaded` tells whether parsing is available.")
        .response::<200, Json<HealthResponse>>()
}

/// Returns routes for service monitoring.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/", get_with(root, root_docs))
        .api_route("/health", get_with(health, health_docs))
        .with_path_items(|item| item.tag("Monitors"))
}
