//! Delegate surface of the playback session.

use crate::error::SessionError;
use crate::state::PlaybackState;
use std::time::Duration;

/// Single subscriber notified of session changes.
///
/// All callbacks are delivered synchronously on the control task, in the
/// order the corresponding events were accepted. Events attributable to a
/// superseded load or a replaced engine never reach the delegate.
///
/// Every method has a no-op default so hosts implement only what they
/// observe.
pub trait SessionDelegate: Send {
    /// The canonical playback state changed. Fired only when the new value
    /// differs from the old.
    fn on_state_changed(&mut self, state: PlaybackState) {
        let _ = state;
    }

    /// Periodic progress tick.
    fn on_time_elapsed(&mut self, position: Duration) {
        let _ = position;
    }

    /// A seek finished. `completed` is false when the seek was interrupted.
    fn on_seek_completed(&mut self, target: Duration, completed: bool) {
        let _ = (target, completed);
    }

    /// An externally-caused failure (resolution or engine item). Reported
    /// exactly once per failure.
    fn on_failed(&mut self, error: &SessionError) {
        let _ = error;
    }

    /// The current item's duration became known or changed.
    fn on_duration_updated(&mut self, duration: Duration) {
        let _ = duration;
    }

    /// The current item played to its end.
    fn on_played_to_end(&mut self) {}

    /// The underlying engine was replaced after an unrecoverable item
    /// failure. Volume/mute/rate/auto-wait tracked by the coordinator have
    /// already been re-applied; hosts re-apply any engine-level
    /// configuration beyond that surface.
    fn on_engine_recreated(&mut self) {}
}

/// Delegate that ignores every callback. Useful as a placeholder.
#[derive(Debug, Default)]
pub struct NoopDelegate;

impl SessionDelegate for NoopDelegate {}
