use std::path::PathBuf;

#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use dolphin_core::{BatchPolicy, DocumentParser, ModelService};
use serde::{Deserialize, Serialize};

use crate::service::{ApiKeys, Error, ParserHandle, Result};

/// Default values for configuration options.
mod defaults {
    /// Default server-side batch cap.
    pub const MAX_BATCH_SIZE: usize = dolphin_core::pipeline::DEFAULT_MAX_BATCH_SIZE;

    /// Default request body limit (32 MiB).
    pub const MAX_UPLOAD_SIZE: usize = 32 * 1024 * 1024;
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Path prefix the API is mounted under (e.g. `/dolphin`).
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ROOT_PATH", default_value = "")
    )]
    #[builder(default)]
    pub root_path: String,

    /// Accepted API keys, separated by commas or whitespace.
    #[cfg_attr(feature = "config", arg(long, env = "API_KEYS"))]
    #[builder(default)]
    pub api_keys: Option<String>,

    /// File with one accepted API key per line.
    #[cfg_attr(feature = "config", arg(long, env = "API_KEYS_FILE"))]
    #[builder(default)]
    pub api_keys_file: Option<PathBuf>,

    /// Upper bound for the per-request element batch size.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MAX_BATCH_SIZE", default_value_t = defaults::MAX_BATCH_SIZE)
    )]
    #[builder(default = "defaults::MAX_BATCH_SIZE")]
    pub max_batch_size: usize,

    /// Maximum request body size in bytes.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MAX_UPLOAD_SIZE", default_value_t = defaults::MAX_UPLOAD_SIZE)
    )]
    #[builder(default = "defaults::MAX_UPLOAD_SIZE")]
    pub max_upload_size: usize,
}

impl ServiceConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(root_path) = &self.root_path {
            validate_root_path(root_path)?;
        }

        if let Some(0) = self.max_batch_size {
            return Err("max_batch_size must be at least 1".to_owned());
        }

        if let Some(0) = self.max_upload_size {
            return Err("max_upload_size must be at least 1".to_owned());
        }

        Ok(())
    }
}

fn validate_root_path(root_path: &str) -> Result<(), String> {
    if root_path.is_empty() {
        return Ok(());
    }

    if !root_path.starts_with('/') {
        return Err(format!("root_path must start with '/', got '{root_path}'"));
    }

    if root_path.len() > 1 && root_path.ends_with('/') {
        return Err(format!("root_path must not end with '/', got '{root_path}'"));
    }

    Ok(())
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Validates values that bypassed the builder (e.g. parsed by clap).
    pub fn validate(&self) -> Result<()> {
        validate_root_path(&self.root_path).map_err(Error::config)?;

        if self.max_batch_size == 0 {
            return Err(Error::config("max_batch_size must be at least 1"));
        }

        if self.max_upload_size == 0 {
            return Err(Error::config("max_upload_size must be at least 1"));
        }

        Ok(())
    }

    /// Root path with a lone `/` folded to the empty prefix.
    pub fn root_path(&self) -> &str {
        match self.root_path.as_str() {
            "/" => "",
            path => path,
        }
    }

    /// Server-side batch policy.
    pub fn batch_policy(&self) -> BatchPolicy {
        BatchPolicy::new(self.max_batch_size)
    }

    /// Loads the configured API keys.
    pub async fn load_api_keys(&self) -> Result<ApiKeys> {
        ApiKeys::load(self.api_keys.as_deref(), self.api_keys_file.as_deref()).await
    }

    /// Wraps a model into a parser handle using this configuration.
    pub fn parser_handle(&self, model: Option<ModelService>) -> ParserHandle {
        match model {
            Some(model) => {
                ParserHandle::new(DocumentParser::new(model).with_policy(self.batch_policy()))
            }
            None => ParserHandle::empty(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            root_path: String::new(),
            api_keys: None,
            api_keys_file: None,
            max_batch_size: defaults::MAX_BATCH_SIZE,
            max_upload_size: defaults::MAX_UPLOAD_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = ServiceConfig::builder().build().unwrap();
        assert_eq!(config.max_batch_size, 1);
        assert_eq!(config.root_path(), "");
        assert!(config.api_keys.is_none());
    }

    #[test]
    fn builder_rejects_bad_values() {
        assert!(ServiceConfig::builder().with_max_batch_size(0usize).build().is_err());
        assert!(ServiceConfig::builder().with_root_path("api").build().is_err());
        assert!(ServiceConfig::builder().with_root_path("/api/").build().is_err());
        assert!(ServiceConfig::builder().with_root_path("/api").build().is_ok());
    }

    #[test]
    fn lone_slash_is_no_prefix() {
        let config = ServiceConfig {
            root_path: "/".to_owned(),
            ..ServiceConfig::default()
        };

        assert!(config.validate().is_ok());
        assert_eq!(config.root_path(), "");
    }

    #[test]
    fn batch_policy_follows_config() {
        let config = ServiceConfig::builder()
            .with_max_batch_size(8usize)
            .build()
            .unwrap();
        assert_eq!(config.batch_policy().effective(32), 8);
    }
}
