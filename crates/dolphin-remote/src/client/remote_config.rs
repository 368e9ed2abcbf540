//! Client configuration.

use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};

/// Configuration for the chat completions client.
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "RemoteBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct RemoteConfig {
    /// Base URL of the OpenAI-compatible API, ending in `/`
    #[builder(setter(custom), default = "RemoteConfig::default_base_url()")]
    pub base_url: Url,
    /// Model name sent with every request
    #[builder(default = "RemoteConfig::DEFAULT_MODEL.to_owned()")]
    pub model: String,
    /// Request timeout duration
    #[builder(default = "Duration::from_secs(120)")]
    pub timeout: Duration,
    /// Connection timeout duration
    #[builder(default = "Duration::from_secs(10)")]
    pub connect_timeout: Duration,
    /// Upper bound on generated tokens per answer
    #[builder(default = "4096")]
    pub max_tokens: u32,
    /// User agent string for requests
    #[builder(default = "RemoteConfig::default_user_agent()")]
    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            model: Self::DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            max_tokens: 4096,
            user_agent: Self::default_user_agent(),
        }
    }
}

impl RemoteConfig {
    /// Model name used when none is configured.
    pub const DEFAULT_MODEL: &'static str = "ByteDance/Dolphin";

    /// Create a new configuration builder
    pub fn builder() -> RemoteBuilder {
        RemoteBuilder::default()
    }

    fn default_base_url() -> Url {
        "http://127.0.0.1:8000/v1/".parse().expect("valid default URL")
    }

    fn default_user_agent() -> String {
        format!("dolphin-remote/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl RemoteBuilder {
    /// Set the base URL of the API.
    ///
    /// A trailing `/` is added so relative endpoint paths resolve below it.
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        let mut base_url: Url = url
            .parse()
            .map_err(|e| Error::invalid_config(format!("invalid base URL '{url}': {e}")))?;

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        self.base_url = Some(base_url);
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(timeout) = &self.timeout
            && timeout.is_zero()
        {
            return Err("Timeout must be greater than 0".to_string());
        }

        if let Some(connect_timeout) = &self.connect_timeout
            && connect_timeout.is_zero()
        {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        if let Some(model) = &self.model
            && model.trim().is_empty()
        {
            return Err("Model name must not be empty".to_string());
        }

        if self.max_tokens == Some(0) {
            return Err("Max tokens must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = RemoteConfig::builder()
            .with_model("dolphin-1.5")
            .with_timeout(Duration::from_secs(30))
            .with_max_tokens(1024u32)
            .build()
            .expect("valid config");

        assert_eq!(config.model, "dolphin-1.5");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8000/v1/");
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let config = RemoteConfig::builder()
            .with_base_url("http://gpu-box:9000/v1")
            .expect("valid URL")
            .build()
            .expect("valid config");

        assert_eq!(config.base_url.as_str(), "http://gpu-box:9000/v1/");
        assert_eq!(
            config.base_url.join("chat/completions").unwrap().as_str(),
            "http://gpu-box:9000/v1/chat/completions"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(RemoteConfig::builder().with_base_url("not a url").is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = RemoteConfig::builder()
            .with_timeout(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn blank_model_is_rejected() {
        assert!(RemoteConfig::builder().with_model(" ").build().is_err());
    }
}
