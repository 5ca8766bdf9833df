//! # Field Schema
//!
//! One node of a content type schema. The shape-specific part lives in
//! [`FieldKind`], tagged on `data_type` exactly as the CMS serializes it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub uid: String,

    #[serde(default)]
    pub display_name: String,

    /// Field holds a list of values
    #[serde(default)]
    pub multiple: bool,

    #[serde(default)]
    pub mandatory: bool,

    /// Value is shared across locales and only editable in the master locale
    #[serde(default)]
    pub non_localizable: bool,

    #[serde(default)]
    pub field_metadata: FieldMetadata,

    #[serde(flatten)]
    pub kind: FieldKind,
}

/// Flags the CMS nests under `field_metadata`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    #[serde(default)]
    pub multiline: bool,

    #[serde(default)]
    pub allow_rich_text: bool,

    #[serde(default)]
    pub markdown: bool,

    #[serde(default)]
    pub allow_json_rte: bool,

    /// Role only has read access
    #[serde(default, rename = "updateRestrict")]
    pub update_restrict: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "data_type", rename_all = "snake_case")]
pub enum FieldKind {
    Text {
        #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
        choices: Option<Value>,
    },
    Json,
    Number,
    Boolean,
    Isodate,
    Link,
    File,
    Reference,
    Group {
        #[serde(default)]
        schema: Vec<FieldSchema>,
    },
    GlobalField {
        #[serde(default)]
        schema: Vec<FieldSchema>,
    },
    /// Modular blocks
    Blocks {
        #[serde(default)]
        blocks: Vec<BlockSchema>,
    },
    /// One block of a modular blocks field (never sent by the CMS directly)
    Block {
        #[serde(default)]
        schema: Vec<FieldSchema>,
    },
    ExperienceContainer {
        #[serde(default)]
        variations: Vec<Variation>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSchema {
    pub uid: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub schema: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub uid: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub schema: Vec<FieldSchema>,
}

impl FieldSchema {
    pub fn new(uid: impl Into<String>, kind: FieldKind) -> Self {
        let uid = uid.into();
        Self {
            display_name: uid.clone(),
            uid,
            multiple: false,
            mandatory: false,
            non_localizable: false,
            field_metadata: FieldMetadata::default(),
            kind,
        }
    }

    pub fn text(uid: impl Into<String>) -> Self {
        Self::new(uid, FieldKind::Text { choices: None })
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn with_non_localizable(mut self, non_localizable: bool) -> Self {
        self.non_localizable = non_localizable;
        self
    }

    pub fn with_metadata(mut self, field_metadata: FieldMetadata) -> Self {
        self.field_metadata = field_metadata;
        self
    }

    /// Nested field lists, if this node has any
    pub fn children(&self) -> &[FieldSchema] {
        match &self.kind {
            FieldKind::Group { schema }
            | FieldKind::GlobalField { schema }
            | FieldKind::Block { schema } => schema,
            _ => &[],
        }
    }
}

impl BlockSchema {
    /// Pseudo field standing in for this block in the field map
    pub fn as_field_schema(&self) -> FieldSchema {
        FieldSchema::new(
            self.uid.clone(),
            FieldKind::Block {
                schema: self.schema.clone(),
            },
        )
        .with_display_name(self.title.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_text_flags() {
        let field: FieldSchema = serde_json::from_value(json!({
            "uid": "summary",
            "display_name": "Summary",
            "data_type": "text",
            "field_metadata": { "multiline": true, "description": "" }
        }))
        .unwrap();

        assert_eq!(field.display_name, "Summary");
        assert!(field.field_metadata.multiline);
        assert_eq!(field.kind, FieldKind::Text { choices: None });
    }

    #[test]
    fn test_deserialize_select_keeps_enum() {
        let field: FieldSchema = serde_json::from_value(json!({
            "uid": "color",
            "data_type": "text",
            "enum": { "advanced": false, "choices": [{ "value": "red" }] }
        }))
        .unwrap();

        match field.kind {
            FieldKind::Text { choices: Some(choices) } => {
                assert_eq!(choices["choices"][0]["value"], "red");
            }
            other => panic!("Expected select text field, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_data_type() {
        let field: FieldSchema = serde_json::from_value(json!({
            "uid": "taxonomies",
            "data_type": "taxonomy",
            "taxonomies": []
        }))
        .unwrap();

        assert_eq!(field.kind, FieldKind::Unknown);
    }

    #[test]
    fn test_update_restrict_is_camel_case() {
        let field: FieldSchema = serde_json::from_value(json!({
            "uid": "title",
            "data_type": "text",
            "field_metadata": { "updateRestrict": true }
        }))
        .unwrap();

        assert!(field.field_metadata.update_restrict);
    }
}
