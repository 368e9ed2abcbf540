//! Middleware for `axum::Router` and HTTP request processing.
//!
//! Every group is an extension trait on the router:
//!
//! ```rust,no_run
//! use axum::Router;
//! use dolphin_server::middleware::{
//!     CorsConfig, RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt,
//!     RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_security(&CorsConfig::default(), 32 * 1024 * 1024)
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod auth;
mod observability;
mod recovery;
mod security;
mod specification;

pub use auth::require_api_key;
pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, RouterSecurityExt};
pub use specification::{OpenApiConfig, RouterOpenApiExt};
