//! Image decoding, padding and cropping.

mod codec;
mod margin;
mod page;

pub use self::codec::{decode_base64, decode_bytes, encode_base64_png, encode_png};
pub use self::margin::crop_margin;
pub use self::page::PaddedPage;

/// File extensions accepted for uploads without a content type.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

/// Returns whether a file name carries one of [`SUPPORTED_EXTENSIONS`].
pub fn has_supported_extension(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_matched_case_insensitively() {
        assert!(has_supported_extension("scan.PNG"));
        assert!(has_supported_extension("page.tiff"));
        assert!(!has_supported_extension("notes.pdf"));
        assert!(!has_supported_extension("no_extension"));
    }
}
