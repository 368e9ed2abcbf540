use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Batch size used by `/parse_page` when the client sends none.
pub const DEFAULT_PAGE_BATCH_SIZE: usize = 1;

fn default_page_batch_size() -> usize {
    DEFAULT_PAGE_BATCH_SIZE
}

/// Request body of `POST /parse_page`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ParsePageRequest {
    /// Page image as base64, optionally prefixed with `data:image/...;base64,`.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub image_base64: String,

    /// Number of element crops sent to the model at once.
    ///
    /// Lowered to the server's configured cap.
    #[serde(default = "default_page_batch_size")]
    #[validate(range(min = 1))]
    pub max_batch_size: usize,
}

/// Request body of `POST /parse_element`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ParseElementRequest {
    /// Element image as base64, optionally prefixed with `data:image/...;base64,`.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub image_base64: String,

    /// One of `text`, `table` or `formula`.
    pub element_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_batch_size_defaults_to_one() {
        let request: ParsePageRequest =
            serde_json::from_str(r#"{ "image_base64": "aGk=" }"#).unwrap();
        assert_eq!(request.max_batch_size, 1);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let request = ParsePageRequest {
            image_base64: "aGk=".to_owned(),
            max_batch_size: 0,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn empty_image_is_rejected() {
        let request = ParseElementRequest {
            image_base64: String::new(),
            element_type: "text".to_owned(),
        };
        assert!(request.validate().is_err());
    }
}
