//! Request extractors that reject with the API's error body.
//!
//! Drop-in replacements for their axum counterparts.

mod enhanced_json;
mod enhanced_multipart;
mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_multipart::Multipart;
pub use self::validated_json::ValidateJson;
