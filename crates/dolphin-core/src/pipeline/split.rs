use crate::element::ElementKind;
use crate::geometry::PixelBox;
use crate::imaging::PaddedPage;
use crate::layout::LayoutElement;
use crate::model::ChatRequest;
use crate::pipeline::{ProcessedElement, TRACING_TARGET};

/// A text or table crop waiting for the element pass.
#[derive(Debug, Clone)]
pub struct PendingElement {
    pub label: String,
    pub kind: ElementKind,
    pub original_bbox: PixelBox,
    pub reading_order: usize,
    pub request: ChatRequest,
}

impl PendingElement {
    /// Completes the element with the model's answer.
    pub fn complete(self, answer: &str) -> ProcessedElement {
        ProcessedElement {
            label: self.label,
            kind: self.kind,
            original_bbox: self.original_bbox,
            text: answer.trim().to_owned(),
            reading_order: self.reading_order,
        }
    }
}

/// Layout elements sorted into figures and recognition work.
#[derive(Debug, Default)]
pub struct SplitLayout {
    /// Figures, already complete with empty text.
    pub figures: Vec<ProcessedElement>,
    /// Text and table crops in layout order.
    pub pending: Vec<PendingElement>,
    /// Elements skipped because their box had nothing to crop.
    pub skipped_empty: usize,
    /// Elements skipped because their box could not be resolved.
    pub failed: usize,
}

impl SplitLayout {
    /// Number of elements that will appear in the response.
    pub fn result_count(&self) -> usize {
        self.figures.len() + self.pending.len()
    }
}

/// Walks the layout once, cropping regions and assigning reading order.
///
/// Every element whose coordinates resolve consumes one reading-order index,
/// including those whose crop turns out empty, so neighbours keep their
/// layout position. An element whose coordinates cannot be resolved is
/// logged and skipped without consuming an index.
pub fn split_layout(page: &PaddedPage, elements: &[LayoutElement]) -> SplitLayout {
    let mut split = SplitLayout::default();
    let mut previous: Option<PixelBox> = None;
    let mut reading_order = 0;

    for element in elements {
        let resolved = match page.resolve(&element.bbox, previous) {
            Ok(resolved) => resolved,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    label = %element.label,
                    error = %error,
                    "Skipping layout element with unusable coordinates"
                );
                split.failed += 1;
                continue;
            }
        };

        let order = reading_order;
        reading_order += 1;

        let Some(resolved) = resolved else {
            tracing::debug!(
                target: TRACING_TARGET,
                label = %element.label,
                reading_order = order,
                "Skipping layout element with empty crop"
            );
            split.skipped_empty += 1;
            continue;
        };
        previous = Some(resolved.crop);

        let kind = element.kind();
        match kind.prompt() {
            None => split.figures.push(ProcessedElement {
                label: element.label.clone(),
                kind,
                original_bbox: resolved.original,
                text: String::new(),
                reading_order: order,
            }),
            Some(prompt) => split.pending.push(PendingElement {
                label: element.label.clone(),
                kind,
                original_bbox: resolved.original,
                reading_order: order,
                request: ChatRequest::new(prompt, page.crop(resolved.crop)),
            }),
        }
    }

    split
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;
    use crate::layout::{NormalizedBox, parse_layout};
    use crate::prompt;

    fn blank_page(width: u32, height: u32) -> PaddedPage {
        let source = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        PaddedPage::new(&source).unwrap()
    }

    #[test]
    fn figures_and_text_are_separated() {
        let page = blank_page(100, 100);
        let layout = parse_layout(
            "[0.1,0.1,0.9,0.2] title[0.1,0.3,0.9,0.5] tab[0.1,0.6,0.9,0.9] fig",
        );

        let split = split_layout(&page, &layout);
        assert_eq!(split.figures.len(), 1);
        assert_eq!(split.pending.len(), 2);
        assert_eq!(split.figures[0].reading_order, 2);
        assert!(split.figures[0].text.is_empty());

        assert_eq!(split.pending[0].request.prompt, prompt::TEXT);
        assert_eq!(split.pending[1].request.prompt, prompt::TABLE);
        assert_eq!(split.pending[1].request.image.dimensions(), (80, 20));
    }

    #[test]
    fn empty_crops_consume_reading_order() {
        let page = blank_page(100, 100);
        let layout = parse_layout(
            "[0.1,0.1,0.9,0.2] para[1.2,1.2,1.5,1.5] para[0.1,0.3,0.9,0.4] para",
        );

        let split = split_layout(&page, &layout);
        let orders: Vec<usize> = split.pending.iter().map(|p| p.reading_order).collect();
        assert_eq!(orders, [0, 2]);
        assert_eq!(split.skipped_empty, 1);
        assert_eq!(split.result_count(), 2);
    }

    #[test]
    fn unresolvable_boxes_are_skipped_without_an_index() {
        let page = blank_page(100, 100);
        let layout = vec![
            LayoutElement {
                bbox: NormalizedBox::new(0.1, 0.1, 0.9, 0.2),
                label: "para".to_owned(),
            },
            LayoutElement {
                bbox: NormalizedBox::new(f32::INFINITY, 0.1, 0.9, 0.2),
                label: "para".to_owned(),
            },
            LayoutElement {
                bbox: NormalizedBox::new(0.1, 0.3, 0.9, 0.4),
                label: "para".to_owned(),
            },
        ];

        let split = split_layout(&page, &layout);
        let orders: Vec<usize> = split.pending.iter().map(|p| p.reading_order).collect();
        assert_eq!(orders, [0, 1]);
        assert_eq!(split.failed, 1);
    }

    #[test]
    fn boxes_in_padding_are_empty() {
        // 100x50 source padded to 100x100; the lower half is padding.
        let page = blank_page(100, 50);
        let layout = parse_layout("[0.1,0.6,0.9,0.9] para[0.1,0.1,0.9,0.3] fig");

        let split = split_layout(&page, &layout);
        assert!(split.pending.is_empty());
        assert_eq!(split.skipped_empty, 1);
        assert_eq!(split.figures[0].reading_order, 1);
        assert_eq!(split.figures[0].original_bbox, PixelBox::new(10, 10, 90, 30));
    }

    #[test]
    fn completion_trims_answers() {
        let page = blank_page(10, 10);
        let layout = parse_layout("[0,0,1,1] para");
        let mut split = split_layout(&page, &layout);

        let element = split.pending.remove(0).complete("  hello\n");
        assert_eq!(element.text, "hello");
        assert_eq!(element.reading_order, 0);
    }
}
