//! # Field Types
//!
//! Closed set of field kinds the builder has affordances for. Text fields are
//! split by their metadata flags in a fixed priority order:
//! `multiline` > `allow_rich_text` > `markdown` > `enum` > singleline.

use crate::{FieldKind, FieldSchema};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Multiline,
    HtmlRte,
    MarkdownRte,
    Select,
    Singleline,
    JsonRte,
    ModularBlock,
    Link,
    Isodate,
    Boolean,
    Block,
    Number,
    Reference,
    Group,
    ExperienceContainer,
    File,
    GlobalField,
}

impl FieldType {
    /// `None` means the field gets no type-specific affordance.
    pub fn classify(schema: &FieldSchema) -> Option<Self> {
        let flags = &schema.field_metadata;
        let field_type = match &schema.kind {
            FieldKind::Text { choices } => {
                if flags.multiline {
                    FieldType::Multiline
                } else if flags.allow_rich_text {
                    FieldType::HtmlRte
                } else if flags.markdown {
                    FieldType::MarkdownRte
                } else if choices.is_some() {
                    FieldType::Select
                } else {
                    FieldType::Singleline
                }
            }
            FieldKind::Json if flags.allow_json_rte => FieldType::JsonRte,
            FieldKind::Json => return None,
            FieldKind::Blocks { .. } => FieldType::ModularBlock,
            FieldKind::Link => FieldType::Link,
            FieldKind::Isodate => FieldType::Isodate,
            FieldKind::Boolean => FieldType::Boolean,
            FieldKind::Block { .. } => FieldType::Block,
            FieldKind::Number => FieldType::Number,
            FieldKind::Reference => FieldType::Reference,
            FieldKind::Group { .. } => FieldType::Group,
            FieldKind::ExperienceContainer { .. } => FieldType::ExperienceContainer,
            FieldKind::File => FieldType::File,
            FieldKind::GlobalField { .. } => FieldType::GlobalField,
            FieldKind::Unknown => return None,
        };
        Some(field_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Multiline => "multiline",
            FieldType::HtmlRte => "html_rte",
            FieldType::MarkdownRte => "markdown_rte",
            FieldType::Select => "select",
            FieldType::Singleline => "singleline",
            FieldType::JsonRte => "json_rte",
            FieldType::ModularBlock => "modular_block",
            FieldType::Link => "link",
            FieldType::Isodate => "isodate",
            FieldType::Boolean => "boolean",
            FieldType::Block => "block",
            FieldType::Number => "number",
            FieldType::Reference => "reference",
            FieldType::Group => "group",
            FieldType::ExperienceContainer => "experience_container",
            FieldType::File => "file",
            FieldType::GlobalField => "global_field",
        }
    }

    /// Text-like scalars that are edited in place.
    pub fn is_content_editable(&self) -> bool {
        matches!(
            self,
            FieldType::Singleline | FieldType::Multiline | FieldType::Number
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldMetadata;
    use serde_json::json;

    fn text_with(metadata: FieldMetadata, choices: Option<serde_json::Value>) -> FieldSchema {
        FieldSchema::new("field", FieldKind::Text { choices }).with_metadata(metadata)
    }

    #[test]
    fn test_text_priority_order() {
        let all_flags = FieldMetadata {
            multiline: true,
            allow_rich_text: true,
            markdown: true,
            ..Default::default()
        };
        assert_eq!(
            FieldType::classify(&text_with(all_flags, Some(json!({})))),
            Some(FieldType::Multiline)
        );

        let rich = FieldMetadata {
            allow_rich_text: true,
            markdown: true,
            ..Default::default()
        };
        assert_eq!(
            FieldType::classify(&text_with(rich, None)),
            Some(FieldType::HtmlRte)
        );

        let markdown = FieldMetadata {
            markdown: true,
            ..Default::default()
        };
        assert_eq!(
            FieldType::classify(&text_with(markdown, Some(json!({})))),
            Some(FieldType::MarkdownRte)
        );

        assert_eq!(
            FieldType::classify(&text_with(FieldMetadata::default(), Some(json!({})))),
            Some(FieldType::Select)
        );
        assert_eq!(
            FieldType::classify(&text_with(FieldMetadata::default(), None)),
            Some(FieldType::Singleline)
        );
    }

    #[test]
    fn test_json_requires_rte_flag() {
        let plain = FieldSchema::new("data", FieldKind::Json);
        assert_eq!(FieldType::classify(&plain), None);

        let rte = plain.with_metadata(FieldMetadata {
            allow_json_rte: true,
            ..Default::default()
        });
        assert_eq!(FieldType::classify(&rte), Some(FieldType::JsonRte));
    }

    #[test]
    fn test_passthrough_kinds() {
        let blocks = FieldSchema::new("sections", FieldKind::Blocks { blocks: vec![] });
        assert_eq!(FieldType::classify(&blocks), Some(FieldType::ModularBlock));
        assert_eq!(
            FieldType::classify(&FieldSchema::new("ref", FieldKind::Reference)),
            Some(FieldType::Reference)
        );
        assert_eq!(FieldType::classify(&FieldSchema::new("x", FieldKind::Unknown)), None);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_value(FieldType::HtmlRte).unwrap(), "html_rte");
        assert_eq!(FieldType::ExperienceContainer.to_string(), "experience_container");
    }
}
