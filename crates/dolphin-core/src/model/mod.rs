//! Abstraction over the vision-language model.
//!
//! The pipelines only need a narrow `chat` interface: one prompt and one
//! image in, one string out, plus an ordered batched variant. Backends
//! implement [`ModelProvider`]; callers go through [`ModelService`], which
//! adds logging and timing.

mod service;

use std::borrow::Cow;

use async_trait::async_trait;
use futures::future::try_join_all;
use image::RgbImage;

pub use self::service::ModelService;
use crate::Result;
use crate::health::ModelHealth;

/// A single prompt/image pair sent to the model.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Instruction prompt.
    pub prompt: Cow<'static, str>,
    /// Image the prompt refers to.
    pub image: RgbImage,
}

impl ChatRequest {
    /// Creates a new chat request.
    pub fn new(prompt: impl Into<Cow<'static, str>>, image: RgbImage) -> Self {
        Self {
            prompt: prompt.into(),
            image,
        }
    }
}

/// Backend capable of answering chat requests.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Answers a single request.
    async fn chat(&self, request: &ChatRequest) -> Result<String>;

    /// Answers several requests, returning one answer per request in order.
    ///
    /// Requests are sent in chunks of at most `max_batch_size`; requests of a
    /// chunk run concurrently, chunks run one after another.
    async fn chat_batch(
        &self,
        requests: &[ChatRequest],
        max_batch_size: usize,
    ) -> Result<Vec<String>> {
        let mut answers = Vec::with_capacity(requests.len());
        for chunk in requests.chunks(max_batch_size.max(1)) {
            let chunk_answers = try_join_all(chunk.iter().map(|request| self.chat(request))).await?;
            answers.extend(chunk_answers);
        }

        Ok(answers)
    }

    /// Probes the backend.
    async fn health_check(&self) -> Result<ModelHealth>;
}
