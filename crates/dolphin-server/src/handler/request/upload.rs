use axum::body::Bytes;
use dolphin_core::imaging::has_supported_extension;

use crate::extract::Multipart;
use crate::handler::{ErrorKind, Result};

/// Batch size used by `/upload_parse_page` when the form has none.
pub const DEFAULT_UPLOAD_BATCH_SIZE: usize = 4;

/// Name of the multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// A file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub contents: Bytes,
}

impl UploadedFile {
    /// Checks name, type and content of the upload.
    ///
    /// A declared content type must be `image/*`; without one, the file
    /// extension must be a supported image extension.
    pub fn validate(&self) -> Result<()> {
        let file_name = self
            .file_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                ErrorKind::BadRequest
                    .with_message("No valid file provided")
                    .with_resource(FILE_FIELD)
            })?;

        match self.content_type.as_deref() {
            Some(content_type) if !content_type.starts_with("image/") => {
                return Err(ErrorKind::BadRequest
                    .with_message("File must be an image")
                    .with_context(format!("Received content type '{content_type}'"))
                    .with_resource(FILE_FIELD));
            }
            Some(_) => {}
            None if !has_supported_extension(file_name) => {
                return Err(ErrorKind::BadRequest
                    .with_message(
                        "Unsupported file format, upload a jpg, jpeg, png, bmp, tiff or webp image",
                    )
                    .with_resource(FILE_FIELD));
            }
            None => {}
        }

        if self.contents.is_empty() {
            return Err(ErrorKind::BadRequest
                .with_message("File content is empty")
                .with_resource(FILE_FIELD));
        }

        Ok(())
    }
}

/// Fields of an upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub max_batch_size: Option<String>,
    pub element_type: Option<String>,
}

impl UploadForm {
    /// Reads all fields of the form; unknown fields are skipped.
    pub async fn read(Multipart(mut multipart): Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            match field.name() {
                Some(FILE_FIELD) => {
                    let file_name = field.file_name().map(str::to_owned);
                    let content_type = field.content_type().map(str::to_owned);
                    let contents = field.bytes().await?;
                    form.file = Some(UploadedFile {
                        file_name,
                        content_type,
                        contents,
                    });
                }
                Some("max_batch_size") => form.max_batch_size = Some(field.text().await?),
                Some("element_type") => form.element_type = Some(field.text().await?),
                _ => {}
            }
        }

        Ok(form)
    }

    /// Takes the uploaded file, failing when the form has none.
    pub fn take_file(&mut self) -> Result<UploadedFile> {
        self.file.take().ok_or_else(|| {
            ErrorKind::BadRequest
                .with_message("No valid file provided")
                .with_resource(FILE_FIELD)
        })
    }

    /// Batch size from the form, [`DEFAULT_UPLOAD_BATCH_SIZE`] when absent.
    pub fn max_batch_size(&self) -> Result<usize> {
        let Some(value) = self.max_batch_size.as_deref().map(str::trim) else {
            return Ok(DEFAULT_UPLOAD_BATCH_SIZE);
        };

        match value.parse::<usize>() {
            Ok(size) if size >= 1 => Ok(size),
            _ => Err(ErrorKind::BadRequest
                .with_message(format!(
                    "max_batch_size must be a positive integer, got '{value}'"
                ))
                .with_resource("max_batch_size")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: Option<&str>, content_type: Option<&str>, contents: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: file_name.map(str::to_owned),
            content_type: content_type.map(str::to_owned),
            contents: Bytes::from_static(contents),
        }
    }

    #[test]
    fn image_content_type_is_accepted() {
        assert!(upload(Some("scan"), Some("image/png"), b"png").validate().is_ok());
    }

    #[test]
    fn non_image_content_type_is_rejected() {
        let error = upload(Some("scan.png"), Some("text/plain"), b"png")
            .validate()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("File must be an image"));
    }

    #[test]
    fn extension_decides_without_content_type() {
        assert!(upload(Some("scan.JPG"), None, b"jpg").validate().is_ok());

        let error = upload(Some("notes.pdf"), None, b"pdf").validate().unwrap_err();
        assert!(error.message().is_some_and(|m| m.starts_with("Unsupported file format")));
    }

    #[test]
    fn missing_name_and_empty_content_are_rejected() {
        let error = upload(None, Some("image/png"), b"png").validate().unwrap_err();
        assert_eq!(error.message(), Some("No valid file provided"));

        let error = upload(Some("scan.png"), Some("image/png"), b"").validate().unwrap_err();
        assert_eq!(error.message(), Some("File content is empty"));
    }

    #[test]
    fn batch_size_parsing() {
        let mut form = UploadForm::default();
        assert_eq!(form.max_batch_size().unwrap(), 4);

        form.max_batch_size = Some(" 2 ".to_owned());
        assert_eq!(form.max_batch_size().unwrap(), 2);

        form.max_batch_size = Some("zero".to_owned());
        assert!(form.max_batch_size().is_err());

        form.max_batch_size = Some("0".to_owned());
        assert!(form.max_batch_size().is_err());
    }
}
