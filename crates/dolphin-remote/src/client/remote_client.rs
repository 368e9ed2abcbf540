//! Chat completions client implementation.

use dolphin_core::ChatRequest;
use dolphin_core::imaging::encode_base64_png;
use reqwest::{Client as HttpClient, ClientBuilder, Response};

use super::wire::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse};
use super::{RemoteConfig, RemoteCredentials};
use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};

/// Client for an OpenAI-compatible chat completions API.
///
/// Cloning is cheap; clones share the connection pool.
///
/// # Examples
///
/// ```rust,ignore
/// use dolphin_remote::{RemoteClient, RemoteConfig, RemoteCredentials};
///
/// let config = RemoteConfig::builder()
///     .with_base_url("http://localhost:8000/v1")?
///     .build()?;
/// let client = RemoteClient::new(config, RemoteCredentials::None)?;
/// ```
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http_client: HttpClient,
    config: RemoteConfig,
    credentials: RemoteCredentials,
}

impl RemoteClient {
    /// Create a new client with the given configuration and credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: RemoteConfig, credentials: RemoteCredentials) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            model = %config.model,
            credentials = credentials.kind(),
            "Creating model client"
        );

        let http_client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http_client,
            config,
            credentials,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Sends one prompt/image pair and returns the generated text.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let image = encode_base64_png(&request.image).map_err(Error::Encoding)?;
        let body = ChatCompletionRequest::single_image(
            &self.config.model,
            self.config.max_tokens,
            &image,
            &request.prompt,
        );

        let url = self.config.base_url.join("chat/completions")?;
        let response = self
            .credentials
            .apply(self.http_client.post(url))
            .json(&body)
            .send()
            .await?;

        let response = Self::error_for_status(response).await?;
        let completion: ChatCompletionResponse = serde_json::from_slice(&response.bytes().await?)?;

        completion
            .into_answer()
            .ok_or_else(|| Error::empty_response(&self.config.model))
    }

    /// Lists the models served by the API.
    ///
    /// Used as a health probe; also verifies the credentials.
    pub async fn health_check(&self) -> Result<()> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            "Performing health check"
        );

        let url = self.config.base_url.join("models")?;
        let response = self
            .credentials
            .apply(self.http_client.get(url))
            .send()
            .await?;

        Self::error_for_status(response).await?;
        Ok(())
    }

    async fn error_for_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);

        tracing::warn!(
            target: TRACING_TARGET_CLIENT,
            status = status.as_u16(),
            message = %message,
            "Model server returned an error"
        );

        Err(Error::api_error(status.as_u16(), message))
    }
}
