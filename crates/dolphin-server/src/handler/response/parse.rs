//! Parse response types.

use std::time::Duration;

use dolphin_core::RecognitionResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Body returned by every parse endpoint.
///
/// Pipeline failures are reported with `success: false` and a message; the
/// HTTP status stays `200`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParseResponse {
    /// Whether parsing finished.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Recognized elements, absent on failure.
    pub results: Option<Vec<RecognitionResult>>,
    /// Wall-clock processing time in seconds.
    pub processing_time: Option<f64>,
}

impl ParseResponse {
    /// Creates a successful response.
    pub fn succeeded(
        message: impl Into<String>,
        results: Vec<RecognitionResult>,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            results: Some(results),
            processing_time: Some(elapsed.as_secs_f64()),
        }
    }

    /// Creates a failed response for a pipeline error.
    pub fn failed(error: impl std::fmt::Display, elapsed: Duration) -> Self {
        Self {
            success: false,
            message: format!("Parsing failed: {error}"),
            results: None,
            processing_time: Some(elapsed.as_secs_f64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_response_keeps_null_results() {
        let response = ParseResponse::failed("model error", Duration::from_millis(1500));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Parsing failed: model error");
        assert!(json["results"].is_null());
        assert_eq!(json["processing_time"], 1.5);
    }
}
