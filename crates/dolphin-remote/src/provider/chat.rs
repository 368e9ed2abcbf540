//! Remote chat provider implementation.
//!
//! This module implements the [`ModelProvider`] trait on top of an
//! OpenAI-compatible chat completions endpoint.

use dolphin_core::{ChatRequest, ModelHealth, ModelProvider};

use crate::{Error, RemoteClient, TRACING_TARGET_PROVIDER};

/// Remote chat provider.
///
/// # Example
///
/// ```rust,ignore
/// use dolphin_core::ModelService;
/// use dolphin_remote::{RemoteClient, RemoteConfig, RemoteCredentials, RemoteProvider};
///
/// let client = RemoteClient::new(RemoteConfig::default(), RemoteCredentials::None)?;
/// let model = ModelService::new(RemoteProvider::new(client));
/// ```
#[derive(Clone, Debug)]
pub struct RemoteProvider {
    client: RemoteClient,
}

impl RemoteProvider {
    /// Creates a new provider.
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying client.
    pub fn client(&self) -> &RemoteClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl ModelProvider for RemoteProvider {
    fn name(&self) -> &str {
        &self.client.config().model
    }

    async fn chat(&self, request: &ChatRequest) -> dolphin_core::Result<String> {
        tracing::trace!(
            target: TRACING_TARGET_PROVIDER,
            model = self.name(),
            prompt = %request.prompt,
            "Forwarding chat request"
        );

        Ok(self.client.complete(request).await?)
    }

    async fn health_check(&self) -> dolphin_core::Result<ModelHealth> {
        match self.client.health_check().await {
            Ok(()) => Ok(ModelHealth::healthy()),
            Err(Error::ApiError { status, message }) => {
                Ok(ModelHealth::degraded(format!("status {status}: {message}")))
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_PROVIDER,
                    error = %error,
                    "Model server is unreachable"
                );
                Ok(ModelHealth::unhealthy(error.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use dolphin_core::{ErrorKind, ModelService, ModelStatus, prompt};
    use image::{Rgb, RgbImage};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;
    use crate::{RemoteConfig, RemoteCredentials};

    async fn completions(
        State(calls): State<Arc<AtomicUsize>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        calls.fetch_add(1, Ordering::SeqCst);

        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer sk-test") {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "message": "invalid api key" } })),
            );
        }

        let content = &body["messages"][0]["content"];
        let has_image = content[0]["image_url"]["url"]
            .as_str()
            .is_some_and(|url| url.starts_with("data:image/png;base64,"));
        let prompt = content[1]["text"].as_str().unwrap_or_default();

        let answer = format!("{prompt} image={has_image}");
        (
            StatusCode::OK,
            Json(json!({ "choices": [{ "message": { "role": "assistant", "content": answer } }] })),
        )
    }

    async fn spawn_server() -> (String, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .route("/v1/models", get(|| async { Json(json!({ "data": [] })) }))
            .with_state(calls.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        (format!("http://{address}/v1"), calls)
    }

    fn provider(base_url: &str, credentials: RemoteCredentials) -> RemoteProvider {
        let config = RemoteConfig::builder()
            .with_base_url(base_url)
            .unwrap()
            .with_model("dolphin-test")
            .build()
            .unwrap();
        RemoteProvider::new(RemoteClient::new(config, credentials).unwrap())
    }

    fn request(prompt: &'static str) -> ChatRequest {
        ChatRequest::new(prompt, RgbImage::from_pixel(8, 4, Rgb([255, 255, 255])))
    }

    #[tokio::test]
    async fn chat_sends_image_and_prompt() -> anyhow::Result<()> {
        let (base_url, _) = spawn_server().await;
        let provider = provider(&base_url, RemoteCredentials::bearer_token("sk-test"));

        let answer = provider.chat(&request(prompt::TEXT)).await?;
        assert_eq!(answer, format!("{} image=true", prompt::TEXT));
        Ok(())
    }

    #[tokio::test]
    async fn batch_answers_keep_request_order() -> anyhow::Result<()> {
        let (base_url, calls) = spawn_server().await;
        let model = ModelService::new(provider(&base_url, RemoteCredentials::bearer_token("sk-test")));

        let requests = [request(prompt::TABLE), request(prompt::TEXT), request(prompt::TABLE)];
        let answers = model.chat_batch(&requests, 2).await?;

        assert_eq!(answers.len(), 3);
        assert!(answers[0].starts_with(prompt::TABLE));
        assert!(answers[1].starts_with(prompt::TEXT));
        assert!(answers[2].starts_with(prompt::TABLE));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials_are_model_errors() {
        let (base_url, _) = spawn_server().await;
        let provider = provider(&base_url, RemoteCredentials::None);

        let error = provider.chat(&request(prompt::TEXT)).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Model);
        assert!(error.to_string().contains("invalid api key"));
    }

    #[tokio::test]
    async fn health_check_lists_models() -> anyhow::Result<()> {
        let (base_url, _) = spawn_server().await;
        let provider = provider(&base_url, RemoteCredentials::None);

        let health = provider.health_check().await?;
        assert_eq!(health.status, ModelStatus::Healthy);
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_unhealthy() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;
        drop(listener);

        let provider = provider(&format!("http://{address}/v1"), RemoteCredentials::None);
        let health = provider.health_check().await?;
        assert_eq!(health.status, ModelStatus::Unhealthy);
        Ok(())
    }
}
