//! Request types for HTTP handlers.

mod parse;
mod upload;

pub use parse::*;
pub use upload::*;
