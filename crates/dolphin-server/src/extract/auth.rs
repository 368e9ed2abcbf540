//! API key extraction.
//!
//! A key is accepted from either `Authorization: Bearer <key>` or
//! `X-API-Key: <key>`. The bearer header wins when both are present.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderName;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ApiKeys;

/// Alternative header carrying an API key.
pub const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Authenticated caller.
///
/// Holds the fingerprint of the key that matched, or `None` when the server
/// runs without keys and every request is let through.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(pub Option<String>);

impl ApiKey {
    /// Fingerprint of the matched key.
    #[inline]
    pub fn fingerprint(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for ApiKey
where
    S: Sync + Send,
    ApiKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(api_key) = parts.extensions.get::<Self>() {
            return Ok(api_key.clone());
        }

        let api_keys = ApiKeys::from_ref(state);
        let api_key = if api_keys.is_enabled() {
            let presented = presented_key(parts, state).await?;
            if !api_keys.contains(&presented) {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    fingerprint = %ApiKeys::fingerprint(&presented),
                    "Rejected unknown API key"
                );

                return Err(ErrorKind::Unauthorized
                    .with_message("Invalid API key")
                    .with_resource("authentication"));
            }

            Self(Some(ApiKeys::fingerprint(&presented)))
        } else {
            Self(None)
        };

        parts.extensions.insert(api_key.clone());
        Ok(api_key)
    }
}

/// Reads the key presented by the client.
async fn presented_key<S>(parts: &mut Parts, state: &S) -> Result<String>
where
    S: Sync + Send,
{
    type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;

    let bearer = match AuthBearerHeader::from_request_parts(parts, state).await {
        Ok(TypedHeader(Authorization(bearer))) => Some(bearer.token().to_owned()),
        Err(rejection) => match rejection.reason() {
            TypedHeaderRejectionReason::Missing => None,
            TypedHeaderRejectionReason::Error(_) => {
                return Err(ErrorKind::MalformedAuthToken
                    .with_message("Invalid token format")
                    .with_context("Authorization header must contain a Bearer token")
                    .with_resource("authentication"));
            }
            _ => {
                return Err(ErrorKind::InternalServerError
                    .with_message("Authentication processing failed")
                    .with_resource("authentication"));
            }
        },
    };

    if let Some(token) = bearer {
        return non_empty(token);
    }

    match parts.headers.get(X_API_KEY) {
        Some(value) => {
            let token = value.to_str().map_err(|_| {
                ErrorKind::MalformedAuthToken
                    .with_message("Invalid token format")
                    .with_context("X-API-Key header must be visible ASCII")
                    .with_resource("authentication")
            })?;
            non_empty(token.to_owned())
        }
        None => Err(ErrorKind::MissingAuthToken
            .with_message("Authentication required")
            .with_context("Send the key as 'Authorization: Bearer <key>' or 'X-API-Key: <key>'")
            .with_resource("authentication")),
    }
}

fn non_empty(token: String) -> Result<String> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ErrorKind::MalformedAuthToken
            .with_message("Empty API key")
            .with_resource("authentication"));
    }

    Ok(token.to_owned())
}

impl aide::OperationInput for ApiKey {}
