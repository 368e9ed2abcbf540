#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for model calls.
pub const TRACING_TARGET_MODEL: &str = "dolphin_core::model";

/// Tracing target for the page and element pipelines.
pub const TRACING_TARGET_PIPELINE: &str = "dolphin_core::pipeline";

mod error;
mod health;

pub mod element;
pub mod geometry;
pub mod imaging;
pub mod layout;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
pub mod model;
pub mod pipeline;
pub mod prompt;

pub use crate::element::{ElementKind, ElementType};
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::health::{ModelHealth, ModelStatus};
pub use crate::model::{ChatRequest, ModelProvider, ModelService};
pub use crate::pipeline::{BatchPolicy, DocumentParser, RecognitionResult};
