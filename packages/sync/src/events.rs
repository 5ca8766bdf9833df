use serde::{Deserialize, Serialize};
use std::fmt;

/// Every event name exchanged with the parent frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventName {
    GetFieldSchema,
    GetFieldData,
    GetResolvedVariantPermissions,
    GetDiscussionId,
    FocusField,
    UpdateField,
    AddInstance,
    DeleteInstance,
    MoveInstance,
    /// Parent-initiated
    ScrollToViewFieldByCslpValue,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::GetFieldSchema => "get-field-schema",
            EventName::GetFieldData => "get-field-data",
            EventName::GetResolvedVariantPermissions => "get-resolved-variant-permissions",
            EventName::GetDiscussionId => "get-discussion-id",
            EventName::FocusField => "focus-field",
            EventName::UpdateField => "update-field",
            EventName::AddInstance => "add-instance",
            EventName::DeleteInstance => "delete-instance",
            EventName::MoveInstance => "move-instance",
            EventName::ScrollToViewFieldByCslpValue => "scroll-to-view-field-by-cslp-value",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_names_match_as_str() {
        for event in [
            EventName::GetFieldSchema,
            EventName::GetResolvedVariantPermissions,
            EventName::FocusField,
            EventName::MoveInstance,
            EventName::ScrollToViewFieldByCslpValue,
        ] {
            let json = serde_json::to_value(event).unwrap();
            assert_eq!(json, event.as_str());
        }
    }
}
