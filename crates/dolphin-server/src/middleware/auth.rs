use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::extract::ApiKey;

/// Requires a known API key to proceed with the request.
///
/// Passes every request through when no keys are configured.
///
/// ```rust,no_run
/// use axum::extract::Request;
/// use axum::middleware::from_fn_with_state;
/// use dolphin_server::extract::ApiKey;
/// use dolphin_server::middleware::require_api_key;
/// use dolphin_server::service::{ApiKeys, ParserHandle, ServiceState};
///
/// let state = ServiceState::new(ParserHandle::empty(), ApiKeys::new(["key"]));
/// let _guard = from_fn_with_state::<_, _, (ApiKey, Request)>(state, require_api_key);
/// ```
pub async fn require_api_key(api_key: ApiKey, request: Request, next: Next) -> Response {
    if let Some(fingerprint) = api_key.fingerprint() {
        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            fingerprint,
            path = %request.uri().path(),
            "Request authenticated"
        );
    }

    next.run(request).await
}
