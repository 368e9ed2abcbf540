//! Model service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{ChatRequest, ModelProvider};
use crate::health::ModelHealth;
use crate::{Error, Result, TRACING_TARGET_MODEL};

/// Model service wrapper with observability.
///
/// Adds structured logging and timing to any [`ModelProvider`]. The inner
/// provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct ModelService {
    inner: Arc<dyn ModelProvider>,
}

impl ModelService {
    /// Creates a new model service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: ModelProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Name of the wrapped backend.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Answers a single request.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let start = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET_MODEL,
            backend = self.name(),
            prompt = %request.prompt,
            width = request.image.width(),
            height = request.image.height(),
            "Sending chat request"
        );

        let result = self.inner.chat(request).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(answer) => {
                tracing::debug!(
                    target: TRACING_TARGET_MODEL,
                    elapsed_ms = elapsed.as_millis(),
                    answer_len = answer.len(),
                    "Chat request completed"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_MODEL,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Chat request failed"
                );
            }
        }

        result
    }

    /// Answers several requests in order.
    ///
    /// Fails when the backend does not return exactly one answer per request.
    pub async fn chat_batch(
        &self,
        requests: &[ChatRequest],
        max_batch_size: usize,
    ) -> Result<Vec<String>> {
        let start = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET_MODEL,
            backend = self.name(),
            requests = requests.len(),
            max_batch_size,
            "Sending batched chat requests"
        );

        let answers = self
            .inner
            .chat_batch(requests, max_batch_size)
            .await
            .inspect_err(|error| {
                tracing::error!(
                    target: TRACING_TARGET_MODEL,
                    error = %error,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Batched chat requests failed"
                );
            })?;

        if answers.len() != requests.len() {
            return Err(Error::model().with_message(format!(
                "expected {} answers from {}, got {}",
                requests.len(),
                self.name(),
                answers.len()
            )));
        }

        tracing::debug!(
            target: TRACING_TARGET_MODEL,
            elapsed_ms = start.elapsed().as_millis(),
            answers = answers.len(),
            "Batched chat requests completed"
        );

        Ok(answers)
    }

    /// Probes the wrapped backend.
    pub async fn health_check(&self) -> Result<ModelHealth> {
        let start = Instant::now();
        let health = self.inner.health_check().await?;
        Ok(health.with_response_time(start.elapsed()))
    }
}

impl fmt::Debug for ModelService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelService")
            .field("backend", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use image::RgbImage;

    use super::*;
    use crate::ErrorKind;

    /// Answers with the prompt; keeps the default batching.
    struct EchoProvider;

    #[async_trait]
    impl ModelProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<String> {
            Ok(request.prompt.to_string())
        }

        async fn health_check(&self) -> Result<ModelHealth> {
            Ok(ModelHealth::healthy())
        }
    }

    /// Drops the last answer of every batch.
    struct ShortBatchProvider;

    #[async_trait]
    impl ModelProvider for ShortBatchProvider {
        fn name(&self) -> &str {
            "short"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<String> {
            Ok(request.prompt.to_string())
        }

        async fn chat_batch(
            &self,
            requests: &[ChatRequest],
            _max_batch_size: usize,
        ) -> Result<Vec<String>> {
            let keep = requests.len().saturating_sub(1);
            Ok(requests[..keep].iter().map(|r| r.prompt.to_string()).collect())
        }

        async fn health_check(&self) -> Result<ModelHealth> {
            Ok(ModelHealth::healthy())
        }
    }

    fn requests(count: usize) -> Vec<ChatRequest> {
        (0..count)
            .map(|i| ChatRequest::new(format!("prompt {i}"), RgbImage::new(2, 2)))
            .collect()
    }

    #[tokio::test]
    async fn batched_answers_keep_input_order() -> anyhow::Result<()> {
        let service = ModelService::new(EchoProvider);
        let answers = service.chat_batch(&requests(5), 2).await?;

        assert_eq!(
            answers,
            ["prompt 0", "prompt 1", "prompt 2", "prompt 3", "prompt 4"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn zero_batch_size_still_answers() -> anyhow::Result<()> {
        let service = ModelService::new(EchoProvider);
        let answers = service.chat_batch(&requests(3), 0).await?;

        assert_eq!(answers.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn missing_answers_are_a_model_error() {
        let service = ModelService::new(ShortBatchProvider);
        let error = service.chat_batch(&requests(3), 3).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Model);
        assert!(error.to_string().contains("expected 3 answers"));
    }
}
