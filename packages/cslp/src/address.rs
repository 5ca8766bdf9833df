//! # Field Addresses
//!
//! Structured form of a CSLP string. The first three segments always name the
//! entry (`content_type_uid`, `entry_uid`, `locale`); every remaining segment is
//! either a field uid or, when it is all digits, an index into a multiple field.

use crate::{CslpError, VARIANT_PREFIX};
use serde::{Deserialize, Serialize};

/// Decoded CSLP value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAddress {
    #[serde(rename = "content_type_uid")]
    pub content_type_uid: String,

    /// Base entry uid (variant suffix removed)
    #[serde(rename = "entry_uid")]
    pub entry_uid: String,

    #[serde(rename = "locale")]
    pub locale: String,

    /// Variant id carried by a `v2:` address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// The raw attribute value this address was decoded from
    pub cslp_value: String,

    /// Dotted path with index segments removed
    pub field_path: String,

    /// Dotted path with index segments kept
    pub field_path_with_index: String,

    pub multiple_field_metadata: MultipleFieldMetadata,

    pub instance: InstanceDetails,
}

/// Position of the address inside a multiple field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleFieldMetadata {
    /// `-1` unless the last segment is an index
    pub index: i64,
    pub parent_details: Option<ParentDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentDetails {
    pub parent_path: String,
    pub parent_cslp_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDetails {
    /// Path up to and including the last index segment
    pub field_path_with_index: String,
}

impl MultipleFieldMetadata {
    fn none() -> Self {
        Self {
            index: -1,
            parent_details: None,
        }
    }
}

impl FieldAddress {
    /// Parse a CSLP string, reporting why a malformed one was rejected.
    pub fn parse(cslp: &str) -> Result<Self, CslpError> {
        let (is_variant, body) = match cslp.strip_prefix(VARIANT_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, cslp),
        };

        let segments: Vec<&str> = body.split('.').collect();
        if let Some(position) = segments.iter().position(|s| s.is_empty()) {
            return Err(CslpError::EmptySegment(position));
        }

        let mut segments = segments.into_iter();
        let content_type_uid = segments
            .next()
            .ok_or(CslpError::MissingSegment("content_type_uid"))?;
        let entry_segment = segments
            .next()
            .ok_or(CslpError::MissingSegment("entry_uid"))?;
        let locale = segments.next().ok_or(CslpError::MissingSegment("locale"))?;
        let field_segments: Vec<&str> = segments.collect();
        if field_segments.is_empty() {
            return Err(CslpError::MissingSegment("field_path"));
        }

        let (entry_uid, variant) = if is_variant {
            match entry_segment.split_once('_') {
                Some((entry, variant)) => (entry, Some(variant.to_string())),
                None => (entry_segment, None),
            }
        } else {
            (entry_segment, None)
        };

        let field_path = field_segments
            .iter()
            .copied()
            .filter(|s| !is_index(s))
            .collect::<Vec<_>>()
            .join(".");
        let field_path_with_index = field_segments.join(".");

        let instance_path = match field_segments.iter().rposition(|s| is_index(s)) {
            Some(last_index) => field_segments[..=last_index].join("."),
            None => field_path_with_index.clone(),
        };

        let multiple_field_metadata = match field_segments.last() {
            Some(last) if is_index(last) => {
                let index = last
                    .parse::<i64>()
                    .map_err(|_| CslpError::InvalidIndex(last.to_string()))?;
                let parent_path = field_segments[..field_segments.len() - 1].join(".");
                let entry_prefix = if is_variant {
                    format!("{VARIANT_PREFIX}{content_type_uid}.{entry_segment}.{locale}")
                } else {
                    format!("{content_type_uid}.{entry_segment}.{locale}")
                };
                let parent_cslp_value = if parent_path.is_empty() {
                    entry_prefix
                } else {
                    format!("{entry_prefix}.{parent_path}")
                };
                MultipleFieldMetadata {
                    index,
                    parent_details: Some(ParentDetails {
                        parent_path,
                        parent_cslp_value,
                    }),
                }
            }
            _ => MultipleFieldMetadata::none(),
        };

        Ok(Self {
            content_type_uid: content_type_uid.to_string(),
            entry_uid: entry_uid.to_string(),
            locale: locale.to_string(),
            variant,
            cslp_value: cslp.to_string(),
            field_path,
            field_path_with_index,
            multiple_field_metadata,
            instance: InstanceDetails {
                field_path_with_index: instance_path,
            },
        })
    }

    /// Serialize back to the attribute format.
    pub fn to_cslp(&self) -> String {
        encode(
            &self.content_type_uid,
            &self.entry_uid,
            &self.locale,
            self.variant.as_deref(),
            &self.field_path_with_index,
        )
    }

    /// `content_type_uid.entry_uid.locale`, using the base entry uid.
    pub fn entry_prefix(&self) -> String {
        format!("{}.{}.{}", self.content_type_uid, self.entry_uid, self.locale)
    }

    /// Index into the parent multiple field, if this address is an instance.
    pub fn instance_index(&self) -> Option<usize> {
        usize::try_from(self.multiple_field_metadata.index).ok()
    }

    pub fn is_variant(&self) -> bool {
        self.variant.is_some()
    }
}

/// Decode a CSLP string. Malformed values are treated as absent.
pub fn decode(cslp: &str) -> Option<FieldAddress> {
    FieldAddress::parse(cslp).ok()
}

/// Build a CSLP string from its parts.
pub fn encode(
    content_type_uid: &str,
    entry_uid: &str,
    locale: &str,
    variant: Option<&str>,
    field_path_with_index: &str,
) -> String {
    match variant {
        Some(variant) => format!(
            "{VARIANT_PREFIX}{content_type_uid}.{entry_uid}_{variant}.{locale}.{field_path_with_index}"
        ),
        None => format!("{content_type_uid}.{entry_uid}.{locale}.{field_path_with_index}"),
    }
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_field() {
        let address = decode("all_fields.bltentryuid.en-us.title").unwrap();

        assert_eq!(address.content_type_uid, "all_fields");
        assert_eq!(address.entry_uid, "bltentryuid");
        assert_eq!(address.locale, "en-us");
        assert_eq!(address.field_path, "title");
        assert_eq!(address.field_path_with_index, "title");
        assert_eq!(address.multiple_field_metadata.index, -1);
        assert!(address.multiple_field_metadata.parent_details.is_none());
        assert_eq!(address.instance.field_path_with_index, "title");
        assert!(address.variant.is_none());
    }

    #[test]
    fn test_instance_path_stops_at_last_index() {
        let address = decode("page.blt1.en-us.sections.2.cards.0.heading").unwrap();

        assert_eq!(address.field_path, "sections.cards.heading");
        assert_eq!(address.field_path_with_index, "sections.2.cards.0.heading");
        assert_eq!(address.instance.field_path_with_index, "sections.2.cards.0");
        // Last segment is not numeric, so this is not an instance address
        assert_eq!(address.instance_index(), None);
    }

    #[test]
    fn test_trailing_index_has_parent_details() {
        let address = decode("page.blt1.en-us.tags.3").unwrap();

        assert_eq!(address.instance_index(), Some(3));
        let parent = address.multiple_field_metadata.parent_details.unwrap();
        assert_eq!(parent.parent_path, "tags");
        assert_eq!(parent.parent_cslp_value, "page.blt1.en-us.tags");
    }

    #[test]
    fn test_variant_prefix() {
        let address = decode("v2:page.blt1_cs_variant.en-us.gallery.1").unwrap();

        assert_eq!(address.entry_uid, "blt1");
        assert_eq!(address.variant.as_deref(), Some("cs_variant"));
        assert_eq!(address.entry_prefix(), "page.blt1.en-us");
        let parent = address.multiple_field_metadata.parent_details.as_ref().unwrap();
        assert_eq!(parent.parent_cslp_value, "v2:page.blt1_cs_variant.en-us.gallery");
        assert_eq!(address.to_cslp(), "v2:page.blt1_cs_variant.en-us.gallery.1");
    }

    #[test]
    fn test_malformed_values_fail_closed() {
        assert_eq!(
            FieldAddress::parse("page.blt1.en-us"),
            Err(CslpError::MissingSegment("field_path"))
        );
        assert_eq!(
            FieldAddress::parse("page"),
            Err(CslpError::MissingSegment("entry_uid"))
        );
        assert_eq!(
            FieldAddress::parse("page..en-us.title"),
            Err(CslpError::EmptySegment(1))
        );
        assert!(decode("").is_none());
    }

    #[test]
    fn test_index_overflow_is_rejected() {
        let result = FieldAddress::parse("page.blt1.en-us.tags.99999999999999999999999");
        assert!(matches!(result, Err(CslpError::InvalidIndex(_))));
    }
}
