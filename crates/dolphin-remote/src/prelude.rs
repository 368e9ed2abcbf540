//! Prelude for the dolphin-remote crate
//!
//! This module re-exports the most commonly used types from the crate
//! to provide a convenient single import for users.

pub use crate::client::{RemoteClient, RemoteConfig, RemoteCredentials};
pub use crate::error::{Error, Result};
pub use crate::provider::RemoteProvider;
