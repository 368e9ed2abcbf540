//! Page and element parsing handlers for base64 payloads.

use std::time::Instant;

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use dolphin_core::{DocumentParser, ElementType, imaging};
use image::RgbImage;

use crate::extract::{Json, ValidateJson};
use crate::handler::request::{ParseElementRequest, ParsePageRequest};
use crate::handler::response::{ErrorResponse, ParseResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{ParserHandle, ServiceState};

/// Tracing target for parse operations.
const TRACING_TARGET: &str = "dolphin_server::handler::parse";

/// Returns the parser or a 503 when no model is configured.
pub(super) fn loaded_parser(handle: &ParserHandle) -> Result<&DocumentParser> {
    handle.get().ok_or_else(|| {
        ErrorKind::ServiceUnavailable
            .with_message("Model not loaded")
            .with_resource("model")
    })
}

/// Image payload of a parse request.
#[derive(Debug, Clone, Copy)]
pub(super) enum ImageInput<'a> {
    /// Base64 text, optionally a data URI.
    Base64(&'a str),
    /// Raw file contents.
    Bytes(&'a [u8]),
}

impl ImageInput<'_> {
    /// Decodes the payload; failures are client errors.
    fn decode(self) -> Result<RgbImage> {
        let image = match self {
            Self::Base64(data) => imaging::decode_base64(data)?,
            Self::Bytes(bytes) => imaging::decode_bytes(bytes)?,
        };

        Ok(image)
    }
}

/// Runs the page pipeline and folds its outcome into a response body.
pub(super) async fn run_page(
    parser: &DocumentParser,
    input: ImageInput<'_>,
    max_batch_size: usize,
) -> Result<ParseResponse> {
    let started = Instant::now();
    let image = input.decode()?;

    let response = match parser.parse_page(&image, max_batch_size).await {
        Ok(results) => {
            tracing::info!(
                target: TRACING_TARGET,
                width = image.width(),
                height = image.height(),
                results = results.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Page parsed"
            );
            ParseResponse::succeeded("page parsed successfully", results, started.elapsed())
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET,
                error = %error,
                "Page parsing failed"
            );
            ParseResponse::failed(error, started.elapsed())
        }
    };

    Ok(response)
}

/// Runs the element pipeline and folds its outcome into a response body.
pub(super) async fn run_element(
    parser: &DocumentParser,
    input: ImageInput<'_>,
    element_type: ElementType,
) -> Result<ParseResponse> {
    let started = Instant::now();
    let image = input.decode()?;

    let response = match parser.parse_element(&image, element_type).await {
        Ok(results) => {
            tracing::info!(
                target: TRACING_TARGET,
                element_type = %element_type,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Element parsed"
            );
            ParseResponse::succeeded("element parsed successfully", results, started.elapsed())
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET,
                element_type = %element_type,
                error = %error,
                "Element parsing failed"
            );
            ParseResponse::failed(error, started.elapsed())
        }
    };

    Ok(response)
}

/// Parses a whole page given as base64.
#[tracing::instrument(skip_all, fields(max_batch_size = request.max_batch_size))]
async fn parse_page(
    State(handle): State<ParserHandle>,
    ValidateJson(request): ValidateJson<ParsePageRequest>,
) -> Result<(StatusCode, Json<ParseResponse>)> {
    let parser = loaded_parser(&handle)?;
    tracing::debug!(target: TRACING_TARGET, "Parsing page");

    let input = ImageInput::Base64(&request.image_base64);
    let response = run_page(parser, input, request.max_batch_size).await?;

    Ok((StatusCode::OK, Json(response)))
}

fn parse_page_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Parse a page")
        .description(
            "Reads the page layout, recognizes every text and table region and returns the \
             elements in reading order. Pipeline failures are reported with `success: false`.",
        )
        .response::<200, Json<ParseResponse>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<503, Json<ErrorResponse>>()
}

/// Parses a single element given as base64.
#[tracing::instrument(skip_all, fields(element_type = %request.element_type))]
async fn parse_element(
    State(handle): State<ParserHandle>,
    ValidateJson(request): ValidateJson<ParseElementRequest>,
) -> Result<(StatusCode, Json<ParseResponse>)> {
    let parser = loaded_parser(&handle)?;
    let element_type = ElementType::parse(&request.element_type)?;
    tracing::debug!(target: TRACING_TARGET, "Parsing element");

    let input = ImageInput::Base64(&request.image_base64);
    let response = run_element(parser, input, element_type).await?;

    Ok((StatusCode::OK, Json(response)))
}

fn parse_element_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Parse an element")
        .description(
            "Recognizes a single pre-cropped text, table or formula image. Pipeline failures \
             are reported with `success: false`.",
        )
        .response::<200, Json<ParseResponse>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<503, Json<ErrorResponse>>()
}

/// Returns routes for base64 parsing.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/parse_page", post_with(parse_page, parse_page_docs))
        .api_route("/parse_element", post_with(parse_element, parse_element_docs))
        .with_path_items(|item| item.tag("Parsing"))
}
