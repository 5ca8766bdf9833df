//! # CSLP Codec
//!
//! Content Source Location Pointers are the dotted addresses the rendered page
//! carries in its `data-cslp` attributes:
//!
//! ```text
//! <content_type_uid>.<entry_uid>.<locale>.<field_path>[.<index>[.<subpath>]]
//! v2:<content_type_uid>.<entry_uid>_<variant>.<locale>.<field_path>...
//! ```
//!
//! Decoding turns one of those strings into a [`FieldAddress`]: the entry it
//! belongs to, the de-indexed schema path, the indexed path, and the list
//! instance (if any) it points into.
//!
//! ## Usage
//!
//! ```rust
//! use visual_builder_cslp::decode;
//!
//! let address = decode("page.blt123.en-us.sections.2.title").unwrap();
//! assert_eq!(address.field_path, "sections.title");
//! assert_eq!(address.instance.field_path_with_index, "sections.2");
//! ```

mod address;
mod error;

pub use address::{
    decode, encode, FieldAddress, InstanceDetails, MultipleFieldMetadata, ParentDetails,
};
pub use error::CslpError;

/// Attribute that carries a CSLP string in the rendered page.
pub const DATA_CSLP: &str = "data-cslp";

/// Prefix marking a variant-aware CSLP string.
pub const VARIANT_PREFIX: &str = "v2:";
