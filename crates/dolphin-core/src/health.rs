//! Health reporting for model backends.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Operational status of a model backend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    /// The backend answers requests.
    #[default]
    Healthy,
    /// The backend answers but reports a problem.
    Degraded,
    /// The backend cannot be reached.
    Unhealthy,
}

/// Health report of a model backend.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ModelHealth {
    /// Current backend status.
    pub status: ModelStatus,
    /// Round trip time of the health probe.
    pub response: Option<Duration>,
    /// Optional description of the current state.
    pub message: Option<String>,
    /// When the probe was performed.
    pub checked_at: Timestamp,
}

impl ModelHealth {
    /// Creates a healthy report.
    pub fn healthy() -> Self {
        Self {
            status: ModelStatus::Healthy,
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Creates a degraded report.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: ModelStatus::Degraded,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Creates an unhealthy report.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ModelStatus::Unhealthy,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Sets the probe round trip time.
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response = Some(response_time);
        self
    }

    /// Returns whether the backend can serve requests.
    pub fn is_available(&self) -> bool {
        !matches!(self.status, ModelStatus::Unhealthy)
    }
}
