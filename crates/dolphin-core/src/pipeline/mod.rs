//! Page and element parsing pipelines.
//!
//! Page mode runs in two passes: the model first reads the page layout, then
//! every non-figure region is cropped from the padded page and transcribed
//! in one batched call. Element mode sends a single margin-cropped image.

mod dispatch;
mod element;
mod result;
mod split;

use image::RgbImage;

pub use self::dispatch::{BatchPolicy, DEFAULT_MAX_BATCH_SIZE, dispatch};
pub use self::element::parse_element;
pub use self::result::{ProcessedElement, RecognitionResult, sort_by_reading_order};
pub use self::split::{PendingElement, SplitLayout, split_layout};
use crate::element::ElementType;
use crate::imaging::PaddedPage;
use crate::layout::parse_layout;
use crate::model::{ChatRequest, ModelService};
use crate::{Result, prompt};

pub(crate) const TRACING_TARGET: &str = crate::TRACING_TARGET_PIPELINE;

/// Runs both parse modes against a model.
#[derive(Debug, Clone)]
pub struct DocumentParser {
    model: ModelService,
    policy: BatchPolicy,
}

impl DocumentParser {
    /// Creates a parser with the default batch policy.
    pub fn new(model: ModelService) -> Self {
        Self {
            model,
            policy: BatchPolicy::default(),
        }
    }

    /// Replaces the batch policy.
    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying model service.
    pub fn model(&self) -> &ModelService {
        &self.model
    }

    /// The active batch policy.
    pub fn policy(&self) -> BatchPolicy {
        self.policy
    }

    /// Parses a full page.
    ///
    /// Results are sorted by reading order and carry source-image boxes.
    pub async fn parse_page(
        &self,
        image: &RgbImage,
        requested_batch_size: usize,
    ) -> Result<Vec<RecognitionResult>> {
        let layout_request = ChatRequest::new(prompt::LAYOUT, image.clone());
        let layout_output = self.model.chat(&layout_request).await?;
        let layout = parse_layout(&layout_output);

        let page = PaddedPage::new(image)?;
        let split = split_layout(&page, &layout);

        tracing::info!(
            target: TRACING_TARGET,
            layout_elements = layout.len(),
            figures = split.figures.len(),
            pending = split.pending.len(),
            skipped_empty = split.skipped_empty,
            failed = split.failed,
            "Layout split"
        );

        let batch_size = self.policy.effective(requested_batch_size);
        if batch_size < requested_batch_size {
            tracing::info!(
                target: TRACING_TARGET,
                requested = requested_batch_size,
                effective = batch_size,
                "Batch size lowered by policy"
            );
        }

        let mut elements = dispatch(&self.model, split, batch_size).await?;
        sort_by_reading_order(&mut elements);

        Ok(elements.into_iter().map(RecognitionResult::from).collect())
    }

    /// Parses a single pre-cropped element.
    pub async fn parse_element(
        &self,
        image: &RgbImage,
        element_type: ElementType,
    ) -> Result<Vec<RecognitionResult>> {
        let result = parse_element(&self.model, image, element_type).await?;
        Ok(vec![result])
    }
}
