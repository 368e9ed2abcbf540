use image::RgbImage;
use image::imageops::{crop_imm, grayscale};

/// Normalized gray level below which a pixel counts as ink.
const INK_LEVEL: f32 = 200.0;

/// Crops the blank margin around the content of an element image.
///
/// The image is converted to gray, stretched to the full `0..=255` range and
/// cropped to the bounding rectangle of pixels darker than [`INK_LEVEL`].
/// Uniform images and images without ink are returned unchanged.
pub fn crop_margin(image: &RgbImage) -> RgbImage {
    let gray = grayscale(image);
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let (min, max) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
    if min == max {
        return image.clone();
    }

    let range = f32::from(max - min);
    let is_ink = |value: u8| f32::from(value - min) / range * 255.0 < INK_LEVEL;

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in gray.enumerate_pixels() {
        if !is_ink(pixel[0]) {
            continue;
        }

        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x1, y1, x2, y2)) => (x1.min(x), y1.min(y), x2.max(x), y2.max(y)),
        });
    }

    match bounds {
        Some((x1, y1, x2, y2)) => crop_imm(image, x1, y1, x2 - x1 + 1, y2 - y1 + 1).to_image(),
        None => image.clone(),
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn crops_to_ink() {
        let image = RgbImage::from_fn(40, 30, |x, y| {
            if (10..20).contains(&x) && (5..15).contains(&y) {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });

        let cropped = crop_margin(&image);
        assert_eq!(cropped.dimensions(), (10, 10));
        assert_eq!(cropped.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn uniform_image_is_unchanged() {
        let image = RgbImage::from_pixel(12, 8, Rgb([255, 255, 255]));
        assert_eq!(crop_margin(&image), image);
    }

    #[test]
    fn faint_content_is_stretched_before_thresholding() {
        // Light gray text on white still counts as ink after normalization.
        let image = RgbImage::from_fn(20, 20, |x, _| {
            if x == 5 { Rgb([230, 230, 230]) } else { Rgb([250, 250, 250]) }
        });

        let cropped = crop_margin(&image);
        assert_eq!(cropped.dimensions(), (1, 20));
    }
}
