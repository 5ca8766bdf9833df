//! Error types for the sync gateway

use crate::EventName;
use thiserror::Error;

/// Cloneable so one in-flight request can hand its failure to every waiter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parent frame rejected {event}: {reason}")]
    Rejected { event: EventName, reason: String },

    #[error("Malformed payload for {event}: {reason}")]
    Payload { event: EventName, reason: String },

    #[error("Gateway closed")]
    Closed,
}

pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    pub fn payload(event: EventName, error: serde_json::Error) -> Self {
        SyncError::Payload {
            event,
            reason: error.to_string(),
        }
    }
}
