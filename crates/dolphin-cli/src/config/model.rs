//! Model backend configuration.
//!
//! Settings come from arguments or the environment first, then from the
//! optional JSON settings file, then from the client defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use dolphin_core::ModelService;
use dolphin_remote::{RemoteClient, RemoteConfig, RemoteCredentials, RemoteProvider};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Model backend configuration.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the OpenAI-compatible model server.
    ///
    /// Without one the server starts with no model and parse endpoints
    /// answer 503.
    #[arg(long, env = "DOLPHIN_MODEL_URL")]
    pub model_url: Option<String>,

    /// Model name sent with every request.
    #[arg(long, env = "DOLPHIN_MODEL_NAME")]
    pub model_name: Option<String>,

    /// Bearer token for the model server.
    #[arg(long, env = "DOLPHIN_MODEL_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub model_api_key: Option<String>,

    /// Timeout of a single model call in seconds.
    #[arg(long, env = "DOLPHIN_MODEL_TIMEOUT")]
    pub model_timeout: Option<u64>,

    /// Upper bound on generated tokens per answer.
    #[arg(long, env = "DOLPHIN_MODEL_MAX_TOKENS")]
    pub model_max_tokens: Option<u32>,

    /// JSON file with model settings.
    #[arg(long = "config", env = "DOLPHIN_CONFIG")]
    pub config_file: Option<PathBuf>,
}

/// Contents of the model settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSettingsFile {
    pub url: Option<String>,
    pub name: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_tokens: Option<u32>,
}

impl ModelSettingsFile {
    /// Reads and parses a settings file.
    pub async fn read(path: &Path) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read model settings from {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("invalid model settings in {}", path.display()))
    }
}

impl ModelConfig {
    /// Fills unset values from the settings file, if one is configured.
    pub async fn resolve(mut self) -> anyhow::Result<Self> {
        let Some(path) = self.config_file.clone() else {
            return Ok(self);
        };

        let file = ModelSettingsFile::read(&path).await?;
        self.model_url = self.model_url.or(file.url);
        self.model_name = self.model_name.or(file.name);
        self.model_api_key = self.model_api_key.or(file.api_key);
        self.model_timeout = self.model_timeout.or(file.timeout_secs);
        self.model_max_tokens = self.model_max_tokens.or(file.max_tokens);

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            path = %path.display(),
            "Model settings file applied"
        );

        Ok(self)
    }

    /// Builds the client configuration, or `None` without a model URL.
    pub fn remote_config(&self) -> anyhow::Result<Option<RemoteConfig>> {
        let Some(url) = self.model_url.as_deref().filter(|url| !url.trim().is_empty()) else {
            return Ok(None);
        };

        let mut builder = RemoteConfig::builder()
            .with_base_url(url)
            .context("invalid model URL")?;
        if let Some(name) = &self.model_name {
            builder = builder.with_model(name.clone());
        }
        if let Some(timeout) = self.model_timeout {
            builder = builder.with_timeout(Duration::from_secs(timeout));
        }
        if let Some(max_tokens) = self.model_max_tokens {
            builder = builder.with_max_tokens(max_tokens);
        }

        let config = builder.build().context("invalid model configuration")?;
        Ok(Some(config))
    }

    /// Creates the model service, or `None` without a model URL.
    pub fn create_model(&self) -> anyhow::Result<Option<ModelService>> {
        let Some(config) = self.remote_config()? else {
            tracing::warn!(
                target: TRACING_TARGET_CONFIG,
                "No model URL configured, parse endpoints will answer 503"
            );
            return Ok(None);
        };

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            base_url = %config.base_url,
            model = %config.model,
            timeout_secs = config.timeout.as_secs(),
            max_tokens = config.max_tokens,
            "Model configuration"
        );

        let credentials = RemoteCredentials::from_optional_token(self.model_api_key.clone());
        let client = RemoteClient::new(config, credentials).context("failed to create model client")?;

        Ok(Some(ModelService::new(RemoteProvider::new(client))))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn no_url_means_no_model() -> anyhow::Result<()> {
        let config = ModelConfig::default();
        assert!(config.remote_config()?.is_none());
        assert!(config.create_model()?.is_none());
        Ok(())
    }

    #[test]
    fn arguments_override_client_defaults() -> anyhow::Result<()> {
        let config = ModelConfig {
            model_url: Some("http://gpu-box:8000/v1".to_owned()),
            model_name: Some("dolphin-1.5".to_owned()),
            model_timeout: Some(30),
            ..ModelConfig::default()
        };

        let remote = config.remote_config()?.expect("model configured");
        assert_eq!(remote.base_url.as_str(), "http://gpu-box:8000/v1/");
        assert_eq!(remote.model, "dolphin-1.5");
        assert_eq!(remote.timeout, Duration::from_secs(30));
        assert_eq!(remote.max_tokens, RemoteConfig::default().max_tokens);
        Ok(())
    }

    #[test]
    fn invalid_url_is_an_error() {
        let config = ModelConfig {
            model_url: Some("not a url".to_owned()),
            ..ModelConfig::default()
        };
        assert!(config.remote_config().is_err());
    }

    #[tokio::test]
    async fn settings_file_fills_unset_values() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"{{ "url": "http://file-host:8000/v1", "name": "from-file", "max_tokens": 512 }}"#
        )?;

        let config = ModelConfig {
            model_name: Some("from-args".to_owned()),
            config_file: Some(file.path().to_path_buf()),
            ..ModelConfig::default()
        };

        let config = config.resolve().await?;
        assert_eq!(config.model_url.as_deref(), Some("http://file-host:8000/v1"));
        assert_eq!(config.model_name.as_deref(), Some("from-args"));
        assert_eq!(config.model_max_tokens, Some(512));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_settings_are_rejected() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{ "model_path": "./weights" }}"#)?;

        let config = ModelConfig {
            config_file: Some(file.path().to_path_buf()),
            ..ModelConfig::default()
        };
        assert!(config.resolve().await.is_err());
        Ok(())
    }
}
