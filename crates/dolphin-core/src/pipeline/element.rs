use image::RgbImage;

use crate::Result;
use crate::element::ElementType;
use crate::imaging::crop_margin;
use crate::model::{ChatRequest, ModelService};
use crate::pipeline::{RecognitionResult, TRACING_TARGET};

/// Recognizes a single pre-cropped element.
///
/// White margins are trimmed before the image is sent to the model.
pub async fn parse_element(
    model: &ModelService,
    image: &RgbImage,
    element_type: ElementType,
) -> Result<RecognitionResult> {
    let cropped = crop_margin(image);

    tracing::debug!(
        target: TRACING_TARGET,
        element_type = %element_type,
        width = cropped.width(),
        height = cropped.height(),
        "Recognizing single element"
    );

    let request = ChatRequest::new(element_type.prompt(), cropped);
    let answer = model.chat(&request).await?;

    Ok(RecognitionResult {
        label: element_type.result_label().to_owned(),
        bbox: None,
        text: answer.trim().to_owned(),
        reading_order: None,
    })
}
