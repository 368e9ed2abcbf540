//! Page and element parsing handlers for multipart uploads.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use dolphin_core::ElementType;

use super::parse::{ImageInput, loaded_parser, run_element, run_page};
use crate::extract::{Json, Multipart};
use crate::handler::request::UploadForm;
use crate::handler::response::{ErrorResponse, ParseResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{ParserHandle, ServiceState};

/// Tracing target for upload operations.
const TRACING_TARGET: &str = "dolphin_server::handler::upload";

/// Parses an uploaded page image.
#[tracing::instrument(skip_all)]
async fn upload_parse_page(
    State(handle): State<ParserHandle>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ParseResponse>)> {
    let parser = loaded_parser(&handle)?;

    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;
    file.validate()?;
    let max_batch_size = form.max_batch_size()?;

    tracing::debug!(
        target: TRACING_TARGET,
        file_name = file.file_name.as_deref().unwrap_or_default(),
        size = file.contents.len(),
        max_batch_size,
        "Parsing uploaded page"
    );

    let response = run_page(parser, ImageInput::Bytes(&file.contents), max_batch_size).await?;
    Ok((StatusCode::OK, Json(response)))
}

fn upload_parse_page_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Parse an uploaded page")
        .description(
            "Accepts a `file` part with the page image and an optional `max_batch_size` \
             field (default 4).",
        )
        .response::<200, Json<ParseResponse>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<413, Json<ErrorResponse>>()
        .response::<503, Json<ErrorResponse>>()
}

/// Parses an uploaded element image.
#[tracing::instrument(skip_all)]
async fn upload_parse_element(
    State(handle): State<ParserHandle>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ParseResponse>)> {
    let parser = loaded_parser(&handle)?;

    let mut form = UploadForm::read(multipart).await?;
    let element_type = form.element_type.as_deref().ok_or_else(|| {
        ErrorKind::BadRequest
            .with_message("element_type is required")
            .with_resource("element_type")
    })?;
    let element_type = ElementType::parse(element_type)?;

    let file = form.take_file()?;
    file.validate()?;

    tracing::debug!(
        target: TRACING_TARGET,
        file_name = file.file_name.as_deref().unwrap_or_default(),
        size = file.contents.len(),
        element_type = %element_type,
        "Parsing uploaded element"
    );

    let response = run_element(parser, ImageInput::Bytes(&file.contents), element_type).await?;
    Ok((StatusCode::OK, Json(response)))
}

fn upload_parse_element_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Parse an uploaded element")
        .description(
            "Accepts a `file` part with the element image and an `element_type` field \
             (`text`, `table` or `formula`).",
        )
        .response::<200, Json<ParseResponse>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<413, Json<ErrorResponse>>()
        .response::<503, Json<ErrorResponse>>()
}

/// Returns routes for multipart parsing.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/upload_parse_page",
            post_with(upload_parse_page, upload_parse_page_docs),
        )
        .api_route(
            "/upload_parse_element",
            post_with(upload_parse_element, upload_parse_element_docs),
        )
        .with_path_items(|item| item.tag("Uploads"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use dolphin_core::mock::MockProvider;

    use crate::handler::response::ParseResponse;
    use crate::handler::test::{create_test_server_with_model, png_bytes};

    fn image_part(width: u32, height: u32) -> Part {
        Part::bytes(png_bytes(width, height))
            .file_name("page.png")
            .mime_type("image/png")
    }

    #[tokio::test]
    async fn uploaded_page_is_parsed() -> anyhow::Result<()> {
        let provider = MockProvider::new("[0.1,0.1,0.9,0.5] para[0.1,0.6,0.9,0.9] tab");
        let server = create_test_server_with_model(&provider).await?;

        let form = MultipartForm::new()
            .add_text("max_batch_size", "2")
            .add_part("file", image_part(100, 100));
        let response = server.post("/upload_parse_page").multipart(form).await;
        response.assert_status_ok();

        let body = response.json::<ParseResponse>();
        assert!(body.success);
        assert_eq!(body.results.map(|r| r.len()), Some(2));
        assert_eq!(provider.calls(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected() -> anyhow::Result<()> {
        let provider = MockProvider::new("");
        let server = create_test_server_with_model(&provider).await?;

        let part = Part::bytes(b"hello".to_vec())
            .file_name("notes.txt")
            .mime_type("text/plain");
        let form = MultipartForm::new().add_part("file", part);
        let response = server.post("/upload_parse_page").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(provider.calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_rejected() -> anyhow::Result<()> {
        let provider = MockProvider::new("");
        let server = create_test_server_with_model(&provider).await?;

        let form = MultipartForm::new().add_text("max_batch_size", "2");
        let response = server.post("/upload_parse_page").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn uploaded_element_is_parsed() -> anyhow::Result<()> {
        let provider = MockProvider::new("");
        let server = create_test_server_with_model(&provider).await?;

        let form = MultipartForm::new()
            .add_text("element_type", "formula")
            .add_part("file", image_part(30, 20));
        let response = server.post("/upload_parse_element").multipart(form).await;
        response.assert_status_ok();

        let body = response.json::<ParseResponse>();
        assert!(body.success);
        let results = body.results.unwrap_or_default();
        assert_eq!(results[0].label, "formula");
        Ok(())
    }

    #[tokio::test]
    async fn upload_element_type_is_checked_first() -> anyhow::Result<()> {
        let provider = MockProvider::new("");
        let server = create_test_server_with_model(&provider).await?;

        let form = MultipartForm::new()
            .add_text("element_type", "diagram")
            .add_part("file", image_part(30, 20));
        let response = server.post("/upload_parse_element").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(provider.calls(), 0);
        Ok(())
    }
}
