//! Conversion of parser errors raised while reading request input.

use dolphin_core::ErrorKind as CoreErrorKind;

use crate::handler::{Error, ErrorKind};

impl From<dolphin_core::Error> for Error<'static> {
    /// Maps a parser error to an HTTP error.
    ///
    /// Input problems become 400; anything else is a server-side failure.
    /// Handlers turn pipeline failures into a `success: false` body before
    /// this conversion is reached, so it only sees decode-stage errors.
    fn from(error: dolphin_core::Error) -> Self {
        let message = error
            .message
            .clone()
            .unwrap_or_else(|| error.kind_str().to_owned());

        match error.kind() {
            CoreErrorKind::InvalidInput | CoreErrorKind::InvalidImage => {
                ErrorKind::BadRequest.with_message(message)
            }
            CoreErrorKind::ServiceUnavailable => ErrorKind::ServiceUnavailable
                .with_message(message)
                .with_resource("model"),
            CoreErrorKind::Timeout => ErrorKind::GatewayTimeout
                .with_message(message)
                .with_resource("model"),
            _ => ErrorKind::InternalServerError
                .with_message("Request processing failed")
                .with_context(error.to_string()),
        }
    }
}
