//! Error types for the editor

use thiserror::Error;
use visual_builder_sync::SyncError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid builder config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("No field is selected")]
    NoSelection,

    #[error("Selected field is not a list instance")]
    NotAnInstance,

    #[error("Field schema has not been resolved yet")]
    Unresolved,

    #[error("No schema available for {0}")]
    SchemaUnavailable(String),

    #[error("Field is disabled: {0}")]
    FieldDisabled(String),

    #[error("Builder has been destroyed")]
    Destroyed,
}
