//! The LED display coordinator daemon.
//!
//! One process owns the 64×64 panel and serializes every producer through
//! a priority queue and a single worker:
//!
//! ```text
//! producer → [JSON / unix socket] → server → queue → worker → panel
//!                                                 ↘ animation engine ↗
//! ```
//!
//! # Modules
//!
//! - [`config`] — socket path, mock mode, hardware knobs
//! - [`panel`] — the hardware abstraction and its mock
//! - [`animation`] — the single cancellable animation thread
//! - [`queue`] — bounded priority FIFO
//! - [`coordinator`] — enqueue + preemption hook shared with the server
//! - [`worker`] — the dispatch loop
//! - [`server`] — socket accept/reader threads

pub mod animation;
pub mod config;
pub mod coordinator;
pub mod panel;
pub mod queue;
pub mod server;
pub mod worker;

#[cfg(feature = "hardware")]
pub mod hub75;

pub use animation::AnimationEngine;
pub use config::{DaemonConfig, HardwareConfig};
pub use coordinator::CoordinatorHandle;
pub use panel::{lock_panel, MockPanel, Panel, SharedPanel};
pub use queue::{CommandQueue, QueueFull, QueuedCommand};
pub use server::IpcServer;
pub use worker::Worker;

use thiserror::Error;

/// Unrecoverable startup failures; the process exits with code 1.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to bind socket at {path}: {source}")]
    SocketBindFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("hardware init failed: {0}")]
    HardwareInit(String),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}
