//! # Field Disablement
//!
//! A field is read-only when any restriction applies. When several do, the
//! reported reason follows a fixed precedence:
//! role > locale > audience mode > variant permission.

use serde::Serialize;
use visual_builder_cslp::FieldAddress;
use visual_builder_dom::Dom;
use visual_builder_schema::FieldSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisableReason {
    ReadOnly,
    LocalizedEntry,
    AudienceMode,
    VariantPermission,
}

impl DisableReason {
    pub fn message(&self) -> &'static str {
        match self {
            DisableReason::ReadOnly => "You have only read access to this field",
            DisableReason::LocalizedEntry => "Editing this field is restricted in localized entries",
            DisableReason::AudienceMode => "Editing this field is restricted due to audience mode",
            DisableReason::VariantPermission => "You do not have permission to edit this variant",
        }
    }
}

/// Outcome of [`is_field_disabled`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldDisableState {
    pub reason: Option<DisableReason>,
}

impl FieldDisableState {
    pub fn is_disabled(&self) -> bool {
        self.reason.is_some()
    }

    /// Empty when the field is editable
    pub fn reason_text(&self) -> &'static str {
        self.reason.map_or("", |r| r.message())
    }
}

/// Everything besides the schema that restrictions depend on
#[derive(Debug, Clone, Copy)]
pub struct DisableInputs<'a> {
    pub locale: &'a str,
    pub master_locale: &'a str,
    pub audience_mode: bool,
    /// Editable element carries the variant-field marker class
    pub is_variant_field: bool,
    /// `None` when no variant permission lookup applies
    pub variant_update_allowed: Option<bool>,
}

pub fn evaluate_disablement(schema: &FieldSchema, inputs: &DisableInputs<'_>) -> FieldDisableState {
    let reason = if schema.field_metadata.update_restrict {
        Some(DisableReason::ReadOnly)
    } else if schema.non_localizable && inputs.locale != inputs.master_locale {
        Some(DisableReason::LocalizedEntry)
    } else if inputs.audience_mode && !inputs.is_variant_field {
        Some(DisableReason::AudienceMode)
    } else if inputs.variant_update_allowed == Some(false) {
        Some(DisableReason::VariantPermission)
    } else {
        None
    };
    FieldDisableState { reason }
}

/// Disablement for a field rendered by `editable`.
pub fn is_field_disabled<D: Dom>(
    dom: &D,
    schema: &FieldSchema,
    editable: &D::Node,
    address: &FieldAddress,
    settings: &DisableSettings<'_>,
) -> FieldDisableState {
    evaluate_disablement(
        schema,
        &DisableInputs {
            locale: &address.locale,
            master_locale: settings.master_locale,
            audience_mode: settings.audience_mode,
            is_variant_field: dom.has_class(editable, settings.variant_field_class),
            variant_update_allowed: settings.variant_update_allowed,
        },
    )
}

/// Builder-level settings for [`is_field_disabled`]
#[derive(Debug, Clone, Copy)]
pub struct DisableSettings<'a> {
    pub master_locale: &'a str,
    pub audience_mode: bool,
    pub variant_field_class: &'a str,
    pub variant_update_allowed: Option<bool>,
}
