//! Request extractors.
//!
//! - [`ApiKey`] checks the caller's key against the configured set.
//! - [`Json`], [`ValidateJson`] and [`Multipart`] replace their axum
//!   counterparts and reject with the API's error body.

mod auth;
pub mod reject;

pub use crate::extract::auth::{ApiKey, X_API_KEY};
pub use crate::extract::reject::{Json, Multipart, ValidateJson};
