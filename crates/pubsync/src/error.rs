//! Error types for pubsync.

use pubsync_core::CoreError;
use pubsync_sync::SyncError;
use thiserror::Error;

/// Errors surfaced by the pubsync facade.
#[derive(Debug, Error)]
pub enum PubsyncError {
    /// Name, component or TLV error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Session error.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
}

/// Result type for pubsync operations.
pub type Result<T> = std::result::Result<T, PubsyncError>;
