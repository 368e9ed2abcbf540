//! Parsing of the raw layout pass output.
//!
//! The layout pass answers with a flat string of `[x1,y1,x2,y2] label`
//! groups, coordinates normalized to `[0, 1]` in the padded image space.
//! The order of appearance is the document's reading order.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::element::ElementKind;

static LAYOUT_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[(\d*\.?\d+),\s*(\d*\.?\d+),\s*(\d*\.?\d+),\s*(\d*\.?\d+)\]\s*(\w+)",
    )
    .expect("valid layout entry pattern")
});

/// A bounding box with coordinates normalized to the padded image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl NormalizedBox {
    /// Creates a new normalized box.
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Returns whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// One region detected by the layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    /// Region in normalized padded coordinates.
    pub bbox: NormalizedBox,
    /// Raw label as emitted by the model (`para`, `tab`, `fig`, ...).
    pub label: String,
}

impl LayoutElement {
    /// Returns how the pipeline treats this element.
    pub fn kind(&self) -> ElementKind {
        ElementKind::from_label(&self.label)
    }
}

/// Extracts every `[x1,y1,x2,y2] label` group from the layout output.
///
/// Text between groups is ignored, so partially garbled output still yields
/// the well-formed entries in their original order.
pub fn parse_layout(output: &str) -> Vec<LayoutElement> {
    LAYOUT_ENTRY
        .captures_iter(output)
        .filter_map(|caps| {
            let coord = |i: usize| caps.get(i)?.as_str().parse::<f32>().ok();
            Some(LayoutElement {
                bbox: NormalizedBox::new(coord(1)?, coord(2)?, coord(3)?, coord(4)?),
                label: caps.get(5)?.as_str().to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_in_order() {
        let output = "[0.10,0.05,0.90,0.12] title[0.10, 0.15, 0.90, 0.40] para\
                      [0.2,0.45,0.8,0.7] tab[0.1,0.75,0.5,0.95]fig";
        let elements = parse_layout(output);

        let labels: Vec<&str> = elements.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["title", "para", "tab", "fig"]);
        assert_eq!(elements[1].bbox, NormalizedBox::new(0.10, 0.15, 0.90, 0.40));
        assert_eq!(elements[2].kind(), ElementKind::Table);
        assert_eq!(elements[3].kind(), ElementKind::Figure);
    }

    #[test]
    fn skips_malformed_groups() {
        let output = "[0.1,0.2,0.3] para [0.1,0.2,0.3,0.4] sec garbage [a,b,c,d] fig";
        let elements = parse_layout(output);

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].label, "sec");
    }

    #[test]
    fn empty_output_yields_nothing() {
        assert!(parse_layout("").is_empty());
        assert!(parse_layout("no boxes here").is_empty());
    }

    #[test]
    fn integer_coordinates_are_accepted() {
        let elements = parse_layout("[0,0,1,1] para");
        assert_eq!(elements[0].bbox, NormalizedBox::new(0.0, 0.0, 1.0, 1.0));
        assert!(elements[0].bbox.is_finite());
    }
}
