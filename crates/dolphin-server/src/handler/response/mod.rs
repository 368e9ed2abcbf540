//! Response types for HTTP handlers.

mod errors;
mod monitors;
mod parse;

pub use errors::*;
pub use monitors::*;
pub use parse::*;
