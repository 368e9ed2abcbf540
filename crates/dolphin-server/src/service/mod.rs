//! Application state, configuration and dependency injection.

mod api_keys;
mod config;
mod parser_handle;
mod state;

pub use crate::service::api_keys::ApiKeys;
pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder, ServiceConfigBuilderError};
pub use crate::service::parser_handle::ParserHandle;
pub use crate::service::state::ServiceState;
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};
