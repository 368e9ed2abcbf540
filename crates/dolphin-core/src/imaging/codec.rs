//! Image decoding and encoding.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbImage};

use crate::{Error, Result};

/// Decodes a base64 image, with or without a `data:image/...;base64,` prefix.
pub fn decode_base64(data: &str) -> Result<RgbImage> {
    let payload = strip_data_uri(data.trim());
    let bytes = STANDARD.decode(payload).map_err(|e| {
        Error::invalid_input()
            .with_message(format!("image_base64 is not valid base64: {e}"))
            .with_source(e)
    })?;

    decode_bytes(&bytes)
}

/// Decodes raw image bytes in any supported format into RGB.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbImage> {
    if bytes.is_empty() {
        return Err(Error::invalid_input().with_message("image data is empty"));
    }

    let image = image::load_from_memory(bytes)?.to_rgb8();
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::invalid_image().with_message("image has no pixels"));
    }

    Ok(image)
}

/// Encodes an image as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

/// Encodes an image as a base64 PNG.
pub fn encode_base64_png(image: &RgbImage) -> Result<String> {
    encode_png(image).map(|png| STANDARD.encode(png))
}

fn strip_data_uri(data: &str) -> &str {
    if data.starts_with("data:image") {
        data.split_once(',').map_or(data, |(_, payload)| payload)
    } else {
        data
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    fn sample() -> RgbImage {
        RgbImage::from_fn(7, 5, |x, y| Rgb([(x * 30) as u8, (y * 40) as u8, 200]))
    }

    #[test]
    fn base64_decoding_is_pixel_exact() {
        let image = sample();
        let encoded = encode_base64_png(&image).unwrap();

        assert_eq!(decode_base64(&encoded).unwrap(), image);
    }

    #[test]
    fn data_uri_prefix_is_stripped() {
        let image = sample();
        let encoded = format!("data:image/png;base64,{}", encode_base64_png(&image).unwrap());

        assert_eq!(decode_base64(&encoded).unwrap(), image);
    }

    #[test]
    fn invalid_base64_is_a_client_error() {
        let error = decode_base64("not base64 !!").unwrap_err();
        assert!(error.kind().is_client_error());
    }

    #[test]
    fn non_image_bytes_are_a_client_error() {
        let error = decode_bytes(b"plain text, not an image").unwrap_err();
        assert!(error.kind().is_client_error());

        let error = decode_bytes(&[]).unwrap_err();
        assert!(error.kind().is_client_error());
    }
}
