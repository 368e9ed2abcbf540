//! Mapping of layout boxes into pixel space.
//!
//! Boxes from the layout pass live in the normalized space of the padded
//! (square, letterboxed) page. [`resolve`] turns one of them into the pixel
//! region to crop from the padded page and the equivalent region in the
//! source image, clamping instead of failing on out-of-range values.

mod edges;

use image::GrayImage;
use serde::{Deserialize, Serialize};

pub use self::edges::{EDGE_DENSITY_THRESHOLD, MAX_EDGE_SHIFT, adjust_edges};
use crate::layout::NormalizedBox;
use crate::{Error, Result};

/// Sizes of the source image and of its padded square counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub original_width: u32,
    pub original_height: u32,
    pub padded_width: u32,
    pub padded_height: u32,
}

impl ImageDimensions {
    /// Dimensions for a source image letterboxed into a `max(w, h)` square.
    pub fn square(width: u32, height: u32) -> Self {
        let side = width.max(height);
        Self {
            original_width: width,
            original_height: height,
            padded_width: side,
            padded_height: side,
        }
    }
}

/// Integer pixel box; `x2` and `y2` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl PixelBox {
    pub const fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub const fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub const fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Returns whether both boxes share a region of non-zero area.
    pub const fn overlaps(&self, other: &PixelBox) -> bool {
        self.x1 < other.x2 && self.x2 > other.x1 && self.y1 < other.y2 && self.y2 > other.y1
    }

    /// Returns the box as `[x1, y1, x2, y2]`.
    pub const fn to_array(self) -> [u32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

/// A layout box resolved into pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBox {
    /// Region to crop from the padded page.
    pub crop: PixelBox,
    /// Same region in source image coordinates.
    pub original: PixelBox,
}

/// Scales a normalized box to padded pixels and clamps it to the page.
///
/// Coordinates are truncated like an integer cast. Returns `None` when the
/// clamped box has no area, which covers boxes lying fully outside the page
/// as well as degenerate and inverted ones.
pub fn scale_to_padded(bbox: &NormalizedBox, dims: ImageDimensions) -> Result<Option<PixelBox>> {
    if !bbox.is_finite() {
        return Err(Error::geometry().with_message(format!(
            "bounding box has non-finite coordinates: {bbox:?}"
        )));
    }

    let scale = |value: f32, extent: u32| -> u32 {
        let scaled = (f64::from(value) * f64::from(extent)).trunc();
        scaled.clamp(0.0, f64::from(extent)) as u32
    };

    let pixel = PixelBox::new(
        scale(bbox.x1, dims.padded_width),
        scale(bbox.y1, dims.padded_height),
        scale(bbox.x2, dims.padded_width),
        scale(bbox.y2, dims.padded_height),
    );

    Ok((!pixel.is_empty()).then_some(pixel))
}

/// Moves the top edge below `previous` when both boxes overlap.
///
/// The layout pass sometimes emits vertically overlapping neighbours; the
/// later box yields the shared band to the earlier one. The result keeps at
/// least one pixel of height.
pub fn separate_from_previous(
    current: PixelBox,
    previous: Option<PixelBox>,
    dims: ImageDimensions,
) -> PixelBox {
    let Some(previous) = previous else {
        return current;
    };

    if !current.overlaps(&previous) {
        return current;
    }

    let y1 = previous.y2.min(dims.padded_height.saturating_sub(1));
    let y2 = if current.y2 <= y1 {
        (y1 + 1).min(dims.padded_height)
    } else {
        current.y2
    };

    PixelBox { y1, y2, ..current }
}

/// Maps a padded box onto the source image.
///
/// Padding is only added to the right and bottom, so the mapping is a clamp.
/// Returns `None` when the box lies entirely inside the padding.
pub fn map_to_original(padded: PixelBox, dims: ImageDimensions) -> Option<PixelBox> {
    if padded.x1 >= dims.original_width || padded.y1 >= dims.original_height {
        return None;
    }

    let original = PixelBox::new(
        padded.x1,
        padded.y1,
        padded.x2.min(dims.original_width),
        padded.y2.min(dims.original_height),
    );

    (!original.is_empty()).then_some(original)
}

/// Resolves one layout box against the padded page.
///
/// `binary` is the Otsu-binarized padded page used to nudge box edges off
/// text strokes, and `previous` the crop box of the preceding element.
/// Returns `Ok(None)` for boxes with nothing to crop.
pub fn resolve(
    bbox: &NormalizedBox,
    binary: &GrayImage,
    dims: ImageDimensions,
    previous: Option<PixelBox>,
) -> Result<Option<ResolvedBox>> {
    let Some(scaled) = scale_to_padded(bbox, dims)? else {
        return Ok(None);
    };

    let adjusted = adjust_edges(binary, scaled);
    let crop = separate_from_previous(adjusted, previous, dims);

    Ok(map_to_original(crop, dims).map(|original| ResolvedBox { crop, original }))
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;

    fn blank(side: u32) -> GrayImage {
        GrayImage::from_pixel(side, side, Luma([255]))
    }

    #[test]
    fn square_dimensions() {
        let dims = ImageDimensions::square(200, 100);
        assert_eq!(dims.padded_width, 200);
        assert_eq!(dims.padded_height, 200);
        assert_eq!(dims.original_height, 100);
    }

    #[test]
    fn scaling_truncates_and_clamps() {
        let dims = ImageDimensions::square(100, 100);
        let bbox = NormalizedBox::new(-0.2, 0.109, 0.559, 1.7);
        let pixel = scale_to_padded(&bbox, dims).unwrap().unwrap();
        assert_eq!(pixel, PixelBox::new(0, 10, 55, 100));
    }

    #[test]
    fn out_of_bounds_box_is_empty() {
        let dims = ImageDimensions::square(100, 100);
        let outside = NormalizedBox::new(1.2, 1.2, 1.5, 1.5);
        assert_eq!(scale_to_padded(&outside, dims).unwrap(), None);

        let inverted = NormalizedBox::new(0.6, 0.1, 0.4, 0.2);
        assert_eq!(scale_to_padded(&inverted, dims).unwrap(), None);
    }

    #[test]
    fn non_finite_box_is_an_error() {
        let dims = ImageDimensions::square(100, 100);
        let bbox = NormalizedBox::new(f32::NAN, 0.0, 0.5, 0.5);
        assert!(scale_to_padded(&bbox, dims).is_err());
    }

    #[test]
    fn overlapping_box_moves_below_previous() {
        let dims = ImageDimensions::square(100, 100);
        let previous = PixelBox::new(10, 10, 90, 40);
        let current = PixelBox::new(10, 30, 90, 60);

        let separated = separate_from_previous(current, Some(previous), dims);
        assert_eq!(separated, PixelBox::new(10, 40, 90, 60));

        let disjoint = PixelBox::new(10, 50, 90, 60);
        assert_eq!(separate_from_previous(disjoint, Some(previous), dims), disjoint);
    }

    #[test]
    fn swallowed_box_keeps_one_pixel() {
        let dims = ImageDimensions::square(100, 100);
        let previous = PixelBox::new(0, 0, 100, 80);
        let current = PixelBox::new(20, 20, 60, 50);

        let separated = separate_from_previous(current, Some(previous), dims);
        assert_eq!(separated, PixelBox::new(20, 80, 60, 81));
    }

    #[test]
    fn boxes_in_padding_do_not_map() {
        let dims = ImageDimensions::square(100, 50);
        assert_eq!(map_to_original(PixelBox::new(10, 60, 90, 90), dims), None);

        let straddling = map_to_original(PixelBox::new(10, 40, 90, 90), dims).unwrap();
        assert_eq!(straddling, PixelBox::new(10, 40, 90, 50));
    }

    #[test]
    fn resolve_on_blank_page_keeps_box() {
        let dims = ImageDimensions::square(100, 100);
        let bbox = NormalizedBox::new(0.1, 0.1, 0.5, 0.5);

        let resolved = resolve(&bbox, &blank(100), dims, None).unwrap().unwrap();
        assert_eq!(resolved.crop, PixelBox::new(10, 10, 50, 50));
        assert_eq!(resolved.original, resolved.crop);
    }
}
