//! # Session Error Types
//!
//! Error taxonomy for the playback session coordinator.
//!
//! Externally-caused failures (resolution, engine item) are reported exactly
//! once through [`SessionDelegate::on_failed`](crate::SessionDelegate::on_failed)
//! and never propagate across the public API; internal race losses (a
//! resolution finishing for a superseded load, an event from a replaced
//! engine) are absorbed silently and have no error variant at all.

use thiserror::Error;

/// Errors surfaced by the playback session coordinator.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The source could not be resolved into a playable asset.
    #[error("Source resolution failed: {0}")]
    ResolutionFailed(String),

    /// The engine's attached item transitioned to a failed status. The
    /// engine itself is replaced on the next `load`, not immediately.
    #[error("Engine item failed: {0}")]
    EngineItemFailed(String),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Returns `true` if this failure came from asset resolution and the
    /// caller may retry the same source.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, SessionError::ResolutionFailed(_))
    }

    /// Returns `true` if this failure came from the engine's item; the next
    /// `load` will transparently rebuild the engine.
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, SessionError::EngineItemFailed(_))
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
