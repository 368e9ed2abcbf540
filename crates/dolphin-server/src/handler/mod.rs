//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust
//! use aide::axum::ApiRouter;
//! use aide::axum::routing::get;
//! use dolphin_server::handler::{CustomRoutes, routes};
//! use dolphin_server::service::{ApiKeys, ParserHandle, ServiceState};
//!
//! async fn version() -> &'static str {
//!     env!("CARGO_PKG_VERSION")
//! }
//!
//! let state = ServiceState::new(ParserHandle::empty(), ApiKeys::disabled());
//!
//! let custom_routes = CustomRoutes::new()
//!     .add_public_routes(ApiRouter::new().api_route("/version", get(version)));
//!
//! let router = routes(custom_routes, state);
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod monitors;
mod parse;
pub mod request;
pub mod response;
mod upload;
mod utility;

use aide::axum::ApiRouter;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::utility::{CustomRoutes, RouterMapFn};
use crate::middleware::require_api_key;
use crate::service::ServiceState;

/// Answers requests that match no route.
#[inline]
pub async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes behind the API key check.
fn protected_routes(additional_routes: Option<ApiRouter<ServiceState>>) -> ApiRouter<ServiceState> {
    let mut router = ApiRouter::new()
        .merge(parse::routes())
        .merge(upload::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

/// Returns an [`ApiRouter`] with all public routes.
fn public_routes(additional_routes: Option<ApiRouter<ServiceState>>) -> ApiRouter<ServiceState> {
    let mut router = ApiRouter::new().merge(monitors::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

/// Returns an [`ApiRouter`] with all routes.
///
/// The parse endpoints require an API key whenever keys are configured;
/// `/` and `/health` never do.
pub fn routes(mut routes: CustomRoutes, state: ServiceState) -> ApiRouter<ServiceState> {
    let require_api_key = from_fn_with_state(state, require_api_key);

    let protected_router =
        protected_routes(routes.take_protected_routes()).route_layer(require_api_key);
    let protected_router = routes.map_protected(protected_router);

    let public_router = public_routes(routes.take_public_routes());

    ApiRouter::new()
        .merge(protected_router)
        .merge(public_router)
}

/// Mounts `router` under `root_path`, or returns it as is for an empty path.
pub fn mount(root_path: &str, router: ApiRouter<ServiceState>) -> ApiRouter<ServiceState> {
    if root_path.is_empty() || root_path == "/" {
        return router;
    }

    ApiRouter::new().nest(root_path, router)
}

#[cfg(test)]
pub(crate) mod test {
    use aide::axum::ApiRouter;
    use aide::openapi::OpenApi;
    use axum_test::TestServer;
    use dolphin_core::mock::MockProvider;
    use dolphin_core::{DocumentParser, ModelService, imaging};
    use image::{Rgb, RgbImage};

    use crate::handler::{CustomRoutes, fallback, routes};
    use crate::service::{ApiKeys, ParserHandle, ServiceState};

    /// Returns a white PNG of the given size.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        imaging::encode_png(&image).expect("encode test image")
    }

    /// Returns a white PNG of the given size as base64.
    pub fn png_base64(width: u32, height: u32) -> String {
        let image = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        imaging::encode_base64_png(&image).expect("encode test image")
    }

    /// Returns state backed by the mock model.
    pub fn state_with_model(provider: &MockProvider, api_keys: ApiKeys) -> ServiceState {
        let parser = DocumentParser::new(ModelService::new(provider.clone()));
        ServiceState::new(ParserHandle::new(parser), api_keys)
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub fn create_test_server_with_state(
        router: ApiRouter<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let mut api = OpenApi::default();
        let app = router
            .finish_api(&mut api)
            .fallback(fallback)
            .with_state(state);

        Ok(TestServer::new(app)?)
    }

    /// Returns a new [`TestServer`] with the default routes and no model.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        let state = ServiceState::new(ParserHandle::empty(), ApiKeys::disabled());
        create_test_server_with_state(routes(CustomRoutes::new(), state.clone()), state)
    }

    /// Returns a new [`TestServer`] with the default routes and a mock model.
    pub async fn create_test_server_with_model(
        provider: &MockProvider,
    ) -> anyhow::Result<TestServer> {
        let state = state_with_model(provider, ApiKeys::disabled());
        create_test_server_with_state(routes(CustomRoutes::new(), state.clone()), state)
    }
}

#[cfg(test)]
mod tests {
    use aide::axum::ApiRouter;
    use aide::axum::routing::get;
    use axum::http::{HeaderValue, StatusCode, header};
    use dolphin_core::mock::MockProvider;
    use serde_json::json;

    use super::test::{create_test_server, create_test_server_with_state, png_base64, state_with_model};
    use super::*;
    use crate::extract::X_API_KEY;
    use crate::handler::response::ParseResponse;
    use crate::service::{ApiKeys, ParserHandle};

    async fn ping() -> &'static str {
        "pong"
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/missing").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn parse_without_model_is_unavailable() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .post("/parse_page")
            .json(&json!({ "image_base64": png_base64(10, 10) }))
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let response = server
            .post("/parse_element")
            .json(&json!({ "image_base64": png_base64(10, 10), "element_type": "diagram" }))
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        Ok(())
    }

    #[tokio::test]
    async fn keys_protect_parse_routes_only() -> anyhow::Result<()> {
        let provider = MockProvider::new("[0,0,1,1] para");
        let state = state_with_model(&provider, ApiKeys::new(["secret-key"]));
        let server = create_test_server_with_state(routes(CustomRoutes::new(), state.clone()), state)?;

        server.get("/health").await.assert_status_ok();

        let body = json!({ "image_base64": png_base64(20, 20) });
        let response = server.post("/parse_page").json(&body).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.maybe_header(header::WWW_AUTHENTICATE),
            Some(HeaderValue::from_static("Bearer"))
        );

        let response = server
            .post("/parse_page")
            .authorization_bearer("wrong-key")
            .json(&body)
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(provider.calls(), 0);

        let response = server
            .post("/parse_page")
            .authorization_bearer("secret-key")
            .json(&body)
            .await;
        response.assert_status_ok();
        assert!(response.json::<ParseResponse>().success);

        let response = server
            .post("/parse_page")
            .add_header(X_API_KEY, HeaderValue::from_static("secret-key"))
            .json(&body)
            .await;
        response.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn custom_routes_are_merged() -> anyhow::Result<()> {
        let state = ServiceState::new(ParserHandle::empty(), ApiKeys::new(["secret-key"]));
        let custom = CustomRoutes::new()
            .add_public_routes(ApiRouter::new().api_route("/ping", get(ping)))
            .add_protected_routes(ApiRouter::new().api_route("/private-ping", get(ping)));
        let server = create_test_server_with_state(routes(custom, state.clone()), state)?;

        server.get("/ping").await.assert_text("pong");
        server
            .get("/private-ping")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/private-ping")
            .authorization_bearer("secret-key")
            .await
            .assert_text("pong");
        Ok(())
    }

    #[tokio::test]
    async fn routes_mount_under_root_path() -> anyhow::Result<()> {
        let state = ServiceState::new(ParserHandle::empty(), ApiKeys::disabled());
        let router = mount("/dolphin", routes(CustomRoutes::new(), state.clone()));
        let server = create_test_server_with_state(router, state)?;

        server.get("/dolphin/health").await.assert_status_ok();
        server.get("/health").await.assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }
}
