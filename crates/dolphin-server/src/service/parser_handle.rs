use dolphin_core::DocumentParser;

/// Shared handle to the document parser.
///
/// Empty until a model backend is configured; handlers answer 503 while it
/// is empty.
#[derive(Debug, Clone, Default)]
pub struct ParserHandle {
    parser: Option<DocumentParser>,
}

impl ParserHandle {
    /// Creates a loaded handle.
    pub fn new(parser: DocumentParser) -> Self {
        Self {
            parser: Some(parser),
        }
    }

    /// Creates a handle without a model.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if a model is available.
    pub fn is_loaded(&self) -> bool {
        self.parser.is_some()
    }

    /// The parser, if a model is available.
    pub fn get(&self) -> Option<&DocumentParser> {
        self.parser.as_ref()
    }
}
