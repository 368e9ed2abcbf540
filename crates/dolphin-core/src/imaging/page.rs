use image::imageops::{crop_imm, grayscale, overlay};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contrast::otsu_level;

use crate::geometry::{self, ImageDimensions, PixelBox, ResolvedBox};
use crate::layout::NormalizedBox;
use crate::{Error, Result};

/// A page letterboxed into a square, ready for the element pass.
///
/// The source image sits in the top-left corner; the right or bottom strip
/// is filled with black. An Otsu-binarized copy is kept for edge adjustment
/// so it is computed once per page.
#[derive(Debug, Clone)]
pub struct PaddedPage {
    image: RgbImage,
    binary: GrayImage,
    dims: ImageDimensions,
}

impl PaddedPage {
    /// Pads `source` to a `max(w, h)` square.
    pub fn new(source: &RgbImage) -> Result<Self> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::invalid_image().with_message("image has no pixels"));
        }

        let dims = ImageDimensions::square(width, height);
        let mut image = RgbImage::from_pixel(dims.padded_width, dims.padded_height, Rgb([0, 0, 0]));
        overlay(&mut image, source, 0, 0);

        let gray = grayscale(&image);
        let level = otsu_level(&gray);
        let binary = GrayImage::from_fn(dims.padded_width, dims.padded_height, |x, y| {
            if gray.get_pixel(x, y)[0] > level { Luma([255]) } else { Luma([0]) }
        });

        Ok(Self {
            image,
            binary,
            dims,
        })
    }

    /// Source and padded sizes.
    pub fn dims(&self) -> ImageDimensions {
        self.dims
    }

    /// The padded image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Resolves a layout box against this page.
    pub fn resolve(
        &self,
        bbox: &NormalizedBox,
        previous: Option<PixelBox>,
    ) -> Result<Option<ResolvedBox>> {
        geometry::resolve(bbox, &self.binary, self.dims, previous)
    }

    /// Copies a region out of the padded image.
    pub fn crop(&self, region: PixelBox) -> RgbImage {
        crop_imm(&self.image, region.x1, region.y1, region.width(), region.height()).to_image()
    }
}
