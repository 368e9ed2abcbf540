//! In-process model used by tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::health::ModelHealth;
use crate::model::{ChatRequest, ModelProvider};
use crate::{Error, Result, prompt};

/// Deterministic model answering from the prompt and the crop size.
///
/// The layout prompt is answered with the configured layout string; the
/// table prompt with `" table {w}x{h} "` and any other prompt with
/// `" text {w}x{h} "`. Answers carry surrounding whitespace so trimming can
/// be observed.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    layout: String,
    failing: bool,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
    batch_sizes: Arc<Mutex<Vec<usize>>>,
}

impl MockProvider {
    /// Creates a mock that answers the layout prompt with `layout`.
    pub fn new(layout: impl Into<String>) -> Self {
        Self {
            layout: layout.into(),
            ..Default::default()
        }
    }

    /// Creates a mock whose every call fails with a model error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    /// Number of `chat` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    /// Batch sizes passed to `chat_batch`, in call order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes
            .lock()
            .map(|sizes| sizes.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.to_string());
        }

        if self.failing {
            return Err(Error::model().with_message("mock model failure"));
        }

        let (width, height) = request.image.dimensions();
        let answer = match request.prompt.as_ref() {
            prompt::LAYOUT => self.layout.clone(),
            prompt::TABLE => format!(" table {width}x{height} "),
            _ => format!(" text {width}x{height} "),
        };

        Ok(answer)
    }

    async fn chat_batch(
        &self,
        requests: &[ChatRequest],
        max_batch_size: usize,
    ) -> Result<Vec<String>> {
        if let Ok(mut sizes) = self.batch_sizes.lock() {
            sizes.push(max_batch_size);
        }

        let mut answers = Vec::with_capacity(requests.len());
        for request in requests {
            answers.push(self.chat(request).await?);
        }

        Ok(answers)
    }

    async fn health_check(&self) -> Result<ModelHealth> {
        if self.failing {
            return Ok(ModelHealth::unhealthy("mock model failure"));
        }

        Ok(ModelHealth::healthy())
    }
}
