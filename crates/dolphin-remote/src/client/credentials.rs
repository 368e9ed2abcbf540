//! Authentication credentials for the model server.

/// Credentials sent with every request to the model server.
#[derive(Clone, Default)]
pub enum RemoteCredentials {
    /// `X-API-Key` header
    ApiKey(String),
    /// `Authorization: Bearer` header, as used by vLLM `--api-key`
    BearerToken(String),
    /// No authentication (local model servers)
    #[default]
    None,
}

impl RemoteCredentials {
    /// Create API key credentials
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Create bearer token credentials
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(token.into())
    }

    /// Bearer credentials for `Some` token, none otherwise.
    pub fn from_optional_token(token: Option<String>) -> Self {
        token
            .filter(|token| !token.trim().is_empty())
            .map_or(Self::None, Self::BearerToken)
    }

    /// Name of the credential type, safe for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "api_key",
            Self::BearerToken(_) => "bearer_token",
            Self::None => "none",
        }
    }

    /// Adds authentication headers to a request.
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::ApiKey(key) => request.header("X-API-Key", key),
            Self::BearerToken(token) => request.bearer_auth(token),
            Self::None => request,
        }
    }
}

impl std::fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RemoteCredentials").field(&self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_disable_authentication() {
        assert_eq!(RemoteCredentials::from_optional_token(None).kind(), "none");
        assert_eq!(
            RemoteCredentials::from_optional_token(Some("  ".to_owned())).kind(),
            "none"
        );
        assert_eq!(
            RemoteCredentials::from_optional_token(Some("sk-local".to_owned())).kind(),
            "bearer_token"
        );
    }

    #[test]
    fn debug_output_hides_secrets() {
        let credentials = RemoteCredentials::api_key("very-secret");
        assert!(!format!("{credentials:?}").contains("very-secret"));
    }
}
