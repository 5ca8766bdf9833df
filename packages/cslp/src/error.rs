//! Error types for the CSLP codec

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CslpError {
    #[error("CSLP value is missing its {0} segment")]
    MissingSegment(&'static str),

    #[error("CSLP value has an empty segment at position {0}")]
    EmptySegment(usize),

    #[error("Instance index out of range: {0}")]
    InvalidIndex(String),
}
