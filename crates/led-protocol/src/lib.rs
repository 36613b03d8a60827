//! Wire contract between producers and the LED display coordinator.
//!
//! The transport is newline-delimited JSON over a local stream socket. Each
//! request is one JSON object, each response one JSON object:
//!
//! ```text
//! -> { "command": "show_symbol", "priority": "HIGH", "params": { "symbol": "error" } }
//! <- { "success": true, "message": "command queued", "error": null }
//! ```
//!
//! # Modules
//!
//! - [`command`] — the closed command set and its parameter shapes
//! - [`payload`] — `LayoutPayload`, the hierarchical progress model
//! - [`request`] — request parsing/serialization and the error taxonomy
//! - [`response`] — acknowledgments and error codes

pub mod command;
pub mod payload;
pub mod request;
pub mod response;

pub use command::{
    Animation, Command, Priority, ShowAnimationParams, ShowLayoutParams, ShowProgressParams,
    ShowSymbolParams, Symbol,
};
pub use payload::{Layout, LayoutPayload, ProjectSummary, SprintSummary, StorySummary};
pub use request::{ProtocolError, Request};
pub use response::{ErrorCode, Response};
