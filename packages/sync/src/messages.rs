//! Payloads exchanged with the parent frame, in their wire shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use visual_builder_cslp::{encode, FieldAddress};
use visual_builder_schema::FieldSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchemaRequest {
    pub content_type_uid: String,
}

/// Carries the content type's schema tree; the path map is built locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchemaResponse {
    pub field_schema_map: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDataRequest {
    pub field_metadata: FieldAddress,
    pub entry_uid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDataResponse {
    #[serde(default)]
    pub field_data: Value,
}

/// Used by both the variant-permission and discussion-id lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadataRequest {
    pub field_metadata: FieldAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantPermissions {
    #[serde(default)]
    pub update: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionIdResponse {
    pub discussion_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusFieldPayload {
    #[serde(rename = "DOMEditStack")]
    pub dom_edit_stack: Vec<FieldAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldPayload {
    pub data: Value,
    pub field_metadata: FieldAddress,
}

/// Side of an instance an action applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstancePosition {
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePayload {
    pub field_metadata: FieldAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<InstancePosition>,
}

/// Location the parent asks the builder to scroll to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollTarget {
    pub content_type_uid: String,
    pub entry_uid: String,
    pub locale: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(rename = "fieldPathWithIndex")]
    pub field_path_with_index: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollToFieldRequest {
    pub cslp_data: ScrollTarget,
}

impl ScrollTarget {
    /// The `data-cslp` value of the element to scroll to
    pub fn cslp_value(&self) -> String {
        encode(
            &self.content_type_uid,
            &self.entry_uid,
            &self.locale,
            self.variant.as_deref(),
            &self.field_path_with_index,
        )
    }
}
