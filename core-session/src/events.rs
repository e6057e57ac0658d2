//! Control-task event marshalling.
//!
//! All asynchronous completions — engine callbacks and resolution outcomes —
//! are funneled through one unbounded channel into the control task that
//! owns the [`SessionCoordinator`](crate::SessionCoordinator). This is the
//! only suspension-like boundary in the system: background contexts send,
//! the control task receives and dispatches, and no shared state is touched
//! anywhere else.

use bridge_engine::{BridgeError, EngineEvent, EngineEventSink, PlayableAsset};
use tokio::sync::mpsc::UnboundedSender;

/// Outcome of one asynchronous resolution attempt.
#[derive(Debug)]
pub enum ResolutionOutcome {
    Loaded(PlayableAsset),
    Failed(BridgeError),
    /// Cancellation won the race. Cancellation is best-effort; the
    /// generation check on the receiving side is the authoritative guard.
    Cancelled,
}

/// Event re-entered on the control task.
#[derive(Debug)]
pub enum SessionEvent {
    /// Engine callback, tagged with the epoch of the engine instance that
    /// produced it. Events from a replaced engine are discarded by tag.
    Engine { epoch: u64, event: EngineEvent },

    /// An active-load resolution finished. Accepted only while `generation`
    /// still matches the latest `load` call.
    LoadResolved {
        generation: u64,
        outcome: ResolutionOutcome,
    },

    /// A preload resolution finished.
    PreloadResolved {
        id: String,
        outcome: ResolutionOutcome,
    },
}

/// Engine event sink that forwards onto the control channel, tagging each
/// event with its engine's epoch.
pub(crate) struct ChannelEventSink {
    epoch: u64,
    events: UnboundedSender<SessionEvent>,
}

impl ChannelEventSink {
    pub(crate) fn new(epoch: u64, events: UnboundedSender<SessionEvent>) -> Self {
        Self { epoch, events }
    }
}

impl EngineEventSink for ChannelEventSink {
    fn deliver(&self, event: EngineEvent) {
        // Send failure means the coordinator is gone; nothing to notify.
        let _ = self.events.send(SessionEvent::Engine {
            epoch: self.epoch,
            event,
        });
    }
}
