#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client operations.
///
/// Use this target for logging client initialization, configuration, and client-level errors.
pub const TRACING_TARGET_CLIENT: &str = "dolphin_remote::client";

/// Tracing target for model provider operations.
pub const TRACING_TARGET_PROVIDER: &str = "dolphin_remote::provider";

mod client;
pub mod error;
#[doc(hidden)]
pub mod prelude;
pub mod provider;

pub use crate::client::{RemoteBuilder, RemoteBuilderError, RemoteClient, RemoteConfig, RemoteCredentials};
pub use crate::error::{Error, Result};
pub use crate::provider::RemoteProvider;
