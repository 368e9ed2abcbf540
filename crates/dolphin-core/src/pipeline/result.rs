use serde::{Deserialize, Serialize};

use crate::element::ElementKind;
use crate::geometry::PixelBox;

/// One entry of a parse response.
///
/// Page mode fills every field; element mode only sets `label` and `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct RecognitionResult {
    /// Raw layout label (`para`, `tab`, `fig`, ...) or the element type.
    pub label: String,
    /// Region in source image pixels as `[x1, y1, x2, y2]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[u32; 4]>,
    /// Recognized content; empty for figures.
    pub text: String,
    /// Position of the element in the layout output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<usize>,
}

/// A page element after recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedElement {
    pub label: String,
    pub kind: ElementKind,
    /// Region in source image pixels.
    pub original_bbox: PixelBox,
    pub text: String,
    pub reading_order: usize,
}

impl From<ProcessedElement> for RecognitionResult {
    fn from(element: ProcessedElement) -> Self {
        Self {
            label: element.label,
            bbox: Some(element.original_bbox.to_array()),
            text: element.text,
            reading_order: Some(element.reading_order),
        }
    }
}

/// Sorts elements by reading order.
///
/// The sort is stable, so applying it to an already sorted list is a no-op.
pub fn sort_by_reading_order(elements: &mut [ProcessedElement]) {
    elements.sort_by_key(|element| element.reading_order);
}
