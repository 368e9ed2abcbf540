//! Monitor response types.

use std::collections::BTreeMap;

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Liveness report of `GET /health`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: String,
    /// Whether a model is configured.
    pub model_loaded: bool,
    /// Unix time of the check, in seconds.
    pub timestamp: f64,
}

impl HealthResponse {
    /// Creates a report stamped with the current time.
    pub fn new(model_loaded: bool) -> Self {
        Self {
            status: "healthy".to_owned(),
            model_loaded,
            timestamp: Timestamp::now().as_duration().as_secs_f64(),
        }
    }
}

/// Service description of `GET /`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RootResponse {
    /// Service name.
    pub message: String,
    /// Crate version.
    pub version: String,
    /// Endpoint names mapped to a short description.
    pub endpoints: BTreeMap<String, String>,
}

impl Default for RootResponse {
    fn default() -> Self {
        let endpoints = [
            ("parse_page", "/parse_page - page-level document parsing"),
            ("parse_element", "/parse_element - element-level parsing"),
            (
                "upload_parse_page",
                "/upload_parse_page - upload a file for page-level parsing",
            ),
            (
                "upload_parse_element",
                "/upload_parse_element - upload a file for element-level parsing",
            ),
        ];

        Self {
            message: "Dolphin Document Parser API".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            endpoints: endpoints
                .into_iter()
                .map(|(name, description)| (name.to_owned(), description.to_owned()))
                .collect(),
        }
    }
}
