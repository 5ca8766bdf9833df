//! # Content Type Schemas
//!
//! Typed form of a content type's schema tree, the flattened
//! path → field lookup built from it, and the field-type classifier.
//!
//! ```text
//! content type schema (tree)
//!         ↓  SchemaFieldMap::build
//! "sections"            → blocks
//! "sections.hero"       → block (synthesized)
//! "sections.hero.title" → text
//!         ↓  FieldType::classify
//! singleline | html_rte | modular_block | ...
//! ```

mod error;
mod field;
mod field_map;
mod field_type;

pub use error::SchemaError;
pub use field::{BlockSchema, FieldKind, FieldMetadata, FieldSchema, Variation};
pub use field_map::SchemaFieldMap;
pub use field_type::FieldType;

/// Parse a content type's top-level field list from JSON.
pub fn parse_schema(json: &str) -> Result<Vec<FieldSchema>, SchemaError> {
    Ok(serde_json::from_str(json)?)
}
