//! Common error type definitions.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Used as the source error in structured error types so any error that
/// implements the standard `Error` trait can be wrapped while keeping the
/// `Send` and `Sync` bounds required by async handlers.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while parsing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input validation failed (bad base64, unknown element type, ...).
    InvalidInput,
    /// The input bytes could not be decoded into an image.
    InvalidImage,
    /// A bounding box could not be mapped into pixel space.
    Geometry,
    /// Image encoding or transformation failed.
    Imaging,
    /// The model returned an error or an unusable answer.
    Model,
    /// The model is not reachable or not loaded.
    ServiceUnavailable,
    /// Network-related error occurred while talking to the model.
    NetworkError,
    /// Timeout occurred.
    Timeout,
    /// Serialization/deserialization error.
    Serialization,
    /// Configuration error.
    Configuration,
}

impl ErrorKind {
    /// Returns whether this kind is caused by the caller's input.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        matches!(self, Self::InvalidInput | Self::InvalidImage)
    }
}

/// A structured error type for document parsing operations.
#[derive(Debug, Error)]
#[error("{}{}", kind.as_ref(), message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new invalid image error.
    pub fn invalid_image() -> Self {
        Self::new(ErrorKind::InvalidImage)
    }

    /// Creates a new geometry error.
    pub fn geometry() -> Self {
        Self::new(ErrorKind::Geometry)
    }

    /// Creates a new imaging error.
    pub fn imaging() -> Self {
        Self::new(ErrorKind::Imaging)
    }

    /// Creates a new model error.
    pub fn model() -> Self {
        Self::new(ErrorKind::Model)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Decoding(_)
            | image::ImageError::Unsupported(_)
            | image::ImageError::Limits(_) => {
                Error::invalid_image()
                    .with_message(err.to_string())
                    .with_source(err)
            }
            _ => Error::imaging().with_message(err.to_string()).with_source(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let error = Error::invalid_input().with_message("unknown element type");
        assert_eq!(error.to_string(), "invalid_input: unknown element type");
    }

    #[test]
    fn display_without_message() {
        let error = Error::model();
        assert_eq!(error.to_string(), "model");
        assert_eq!(error.kind_str(), "model");
    }

    #[test]
    fn client_error_classification() {
        assert!(ErrorKind::InvalidInput.is_client_error());
        assert!(ErrorKind::InvalidImage.is_client_error());
        assert!(!ErrorKind::Model.is_client_error());
        assert!(!ErrorKind::Timeout.is_client_error());
    }

    #[test]
    fn oversized_images_are_client_errors() {
        use image::error::{LimitError, LimitErrorKind};

        let limits = image::ImageError::Limits(LimitError::from_kind(
            LimitErrorKind::InsufficientMemory,
        ));
        let error = Error::from(limits);
        assert_eq!(error.kind(), ErrorKind::InvalidImage);
        assert!(error.kind().is_client_error());
    }

    #[test]
    fn source_is_attached() {
        let io = std::io::Error::other("boom");
        let error = Error::imaging().with_source(io);
        assert!(std::error::Error::source(&error).is_some());
    }
}
