//! # Cross-Frame Sync Gateway
//!
//! The builder lives in an iframe; the CMS lives in the parent window. The two
//! talk over an ordered, promise-based request/response bus. This crate only
//! fixes the contract:
//!
//! - [`Gateway`] – raw `send` / `on` over named events
//! - [`SyncClient`] – typed requests and pushes the builder uses
//! - [`MemoryGateway`] – in-process bus standing in for the parent frame
//!
//! Responses are not ordered across different requests, so callers must
//! re-check their context after every await.

mod client;
mod error;
mod events;
mod gateway;
mod memory;
mod messages;

pub use client::SyncClient;
pub use error::{SyncError, SyncResult};
pub use events::EventName;
pub use gateway::{Gateway, PushHandler, Registration};
pub use memory::{MemoryGateway, SentMessage};
pub use messages::*;

/// Discussion id used when none exists yet or the lookup failed
pub const NEW_DISCUSSION_ID: &str = "new";
