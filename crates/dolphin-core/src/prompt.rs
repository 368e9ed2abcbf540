//! Instruction prompts understood by the Dolphin model.

/// Layout pass: ordered boxes and labels for a whole page.
pub const LAYOUT: &str = "Parse the reading order of this document.";

/// Element pass for table crops.
pub const TABLE: &str = "Parse the table in the image.";

/// Element pass for every other crop (paragraphs, titles, formulas, ...).
pub const TEXT: &str = "Read text in the image.";
