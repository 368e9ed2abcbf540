//! Element classification and element-mode types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::{Error, Result, prompt};

/// Layout label emitted by the model for figures.
pub const FIGURE_LABEL: &str = "fig";

/// Layout label emitted by the model for tables.
pub const TABLE_LABEL: &str = "tab";

/// How a layout element is handled by the page pipeline.
///
/// The model emits fine-grained labels (`title`, `para`, `sec`, `tab`,
/// `fig`, ...); only figures and tables are treated specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ElementKind {
    /// Prose of any kind, transcribed with the text prompt.
    Text,
    /// A table, transcribed with the table prompt.
    Table,
    /// A figure, emitted without recognition.
    Figure,
}

impl ElementKind {
    /// Classifies a raw layout label.
    pub fn from_label(label: &str) -> Self {
        match label {
            FIGURE_LABEL => Self::Figure,
            TABLE_LABEL => Self::Table,
            _ => Self::Text,
        }
    }

    /// Returns the recognition prompt, or `None` for figures.
    pub const fn prompt(self) -> Option<&'static str> {
        match self {
            Self::Text => Some(prompt::TEXT),
            Self::Table => Some(prompt::TABLE),
            Self::Figure => None,
        }
    }
}

/// Element type accepted by the single-element parse mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    IntoStaticStr
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ElementType {
    /// Plain text.
    Text,
    /// A table.
    Table,
    /// A mathematical formula.
    Formula,
}

impl ElementType {
    /// Parses a user supplied element type.
    pub fn parse(value: &str) -> Result<Self> {
        Self::from_str(value.trim()).map_err(|_| {
            Error::invalid_input().with_message(format!(
                "element_type must be text, table or formula, got '{value}'"
            ))
        })
    }

    /// Prompt sent to the model for this element type.
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Table => prompt::TABLE,
            Self::Text | Self::Formula => prompt::TEXT,
        }
    }

    /// Label reported in the result for this element type.
    pub const fn result_label(self) -> &'static str {
        match self {
            Self::Table => TABLE_LABEL,
            Self::Text => "text",
            Self::Formula => "formula",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_classified() {
        assert_eq!(ElementKind::from_label("fig"), ElementKind::Figure);
        assert_eq!(ElementKind::from_label("tab"), ElementKind::Table);
        assert_eq!(ElementKind::from_label("para"), ElementKind::Text);
        assert_eq!(ElementKind::from_label("title"), ElementKind::Text);
    }

    #[test]
    fn figures_have_no_prompt() {
        assert_eq!(ElementKind::Figure.prompt(), None);
        assert_eq!(ElementKind::Table.prompt(), Some(prompt::TABLE));
        assert_eq!(ElementKind::Text.prompt(), Some(prompt::TEXT));
    }

    #[test]
    fn element_type_parsing() {
        assert_eq!(ElementType::parse("text").unwrap(), ElementType::Text);
        assert_eq!(ElementType::parse("table").unwrap(), ElementType::Table);
        assert_eq!(ElementType::parse(" formula ").unwrap(), ElementType::Formula);

        let error = ElementType::parse("diagram").unwrap_err();
        assert!(error.kind().is_client_error());
        assert!(error.to_string().contains("diagram"));
    }

    #[test]
    fn element_type_prompts_and_labels() {
        assert_eq!(ElementType::Table.prompt(), prompt::TABLE);
        assert_eq!(ElementType::Formula.prompt(), prompt::TEXT);
        assert_eq!(ElementType::Table.result_label(), "tab");
        assert_eq!(ElementType::Formula.result_label(), "formula");
        assert_eq!(ElementType::Text.result_label(), "text");
    }
}
