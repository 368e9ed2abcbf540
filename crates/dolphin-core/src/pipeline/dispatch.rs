use serde::{Deserialize, Serialize};

use crate::Result;
use crate::model::{ChatRequest, ModelService};
use crate::pipeline::split::SplitLayout;
use crate::pipeline::{ProcessedElement, TRACING_TARGET};

/// Default upper bound for the per-request batch size.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1;

/// Server-side cap on how many crops are sent to the model at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPolicy {
    max_batch_size: usize,
}

impl BatchPolicy {
    /// Creates a policy capping batches at `max_batch_size` (at least one).
    pub fn new(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: max_batch_size.max(1),
        }
    }

    /// The configured cap.
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Batch size to use for a client-requested size.
    pub fn effective(&self, requested: usize) -> usize {
        requested.clamp(1, self.max_batch_size)
    }
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BATCH_SIZE)
    }
}

/// Sends pending crops to the model and merges the answers with figures.
///
/// The model is not contacted when nothing is pending. The returned list is
/// not sorted.
pub async fn dispatch(
    model: &ModelService,
    split: SplitLayout,
    batch_size: usize,
) -> Result<Vec<ProcessedElement>> {
    let SplitLayout {
        figures, pending, ..
    } = split;

    let mut elements = figures;
    if pending.is_empty() {
        return Ok(elements);
    }

    tracing::debug!(
        target: TRACING_TARGET,
        pending = pending.len(),
        figures = elements.len(),
        batch_size,
        "Recognizing page elements"
    );

    let requests: Vec<ChatRequest> = pending.iter().map(|p| p.request.clone()).collect();
    let answers = model.chat_batch(&requests, batch_size).await?;

    elements.reserve(pending.len());
    elements.extend(
        pending
            .into_iter()
            .zip(answers)
            .map(|(element, answer)| element.complete(&answer)),
    );

    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_batch_is_capped() {
        let policy = BatchPolicy::new(4);
        assert_eq!(policy.effective(16), 4);
        assert_eq!(policy.effective(2), 2);
        assert_eq!(policy.effective(0), 1);
    }

    #[test]
    fn default_policy_is_sequential() {
        let policy = BatchPolicy::default();
        assert_eq!(policy.max_batch_size(), 1);
        assert_eq!(policy.effective(8), 1);
    }

    #[test]
    fn zero_cap_is_raised_to_one() {
        assert_eq!(BatchPolicy::new(0).max_batch_size(), 1);
    }
}
