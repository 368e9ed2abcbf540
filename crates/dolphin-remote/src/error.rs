//! Error types for dolphin-remote.

use dolphin_core::ErrorKind;

use crate::client::RemoteBuilderError;

/// Result type for all operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for remote model operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client/connection errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors when sending or receiving data
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Non-success response from the model server
    #[error("Model API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// The response carried no usable answer
    #[error("Empty response from model '{model}'")]
    EmptyResponse { model: String },

    /// The image could not be encoded for transport
    #[error("Image encoding failed: {0}")]
    Encoding(#[source] dolphin_core::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// Create an API error
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create an empty response error
    pub fn empty_response(model: impl Into<String>) -> Self {
        Self::EmptyResponse {
            model: model.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Kind of the equivalent core error.
    pub fn core_kind(&self) -> ErrorKind {
        match self {
            Error::Http(err) if err.is_timeout() => ErrorKind::Timeout,
            Error::Http(err) if err.is_connect() => ErrorKind::ServiceUnavailable,
            Error::Http(_) => ErrorKind::NetworkError,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::UrlParse(_) | Error::InvalidConfig { .. } => ErrorKind::Configuration,
            Error::ApiError { status: 503, .. } => ErrorKind::ServiceUnavailable,
            Error::ApiError { .. } | Error::EmptyResponse { .. } => ErrorKind::Model,
            Error::Encoding(_) => ErrorKind::Imaging,
        }
    }
}

impl From<RemoteBuilderError> for Error {
    fn from(err: RemoteBuilderError) -> Self {
        Error::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

impl From<Error> for dolphin_core::Error {
    fn from(err: Error) -> Self {
        let kind = err.core_kind();
        dolphin_core::Error::new(kind)
            .with_message(err.to_string())
            .with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_model_errors() {
        let error = dolphin_core::Error::from(Error::api_error(500, "CUDA out of memory"));
        assert_eq!(error.kind(), ErrorKind::Model);
        assert!(error.to_string().contains("CUDA out of memory"));
    }

    #[test]
    fn overloaded_server_is_unavailable() {
        let error = Error::api_error(503, "loading");
        assert_eq!(error.core_kind(), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn config_errors_map_to_configuration() {
        let error = Error::invalid_config("timeout must be greater than 0");
        assert_eq!(error.core_kind(), ErrorKind::Configuration);
    }
}
