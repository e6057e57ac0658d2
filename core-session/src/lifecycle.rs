//! Engine lifecycle: owns the engine instance and rebuilds it after an
//! unrecoverable item failure.
//!
//! Replacement is a full replace, never a repair. Every instance gets a
//! fresh epoch baked into its event sink; the coordinator drops events
//! whose epoch no longer matches, so a replaced engine cannot speak for
//! its successor even if callbacks are still in flight.

use crate::events::{ChannelEventSink, SessionEvent};
use bridge_engine::{EngineFactory, MediaEngine};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

pub(crate) struct EngineLifecycle {
    factory: Arc<dyn EngineFactory>,
    engine: Box<dyn MediaEngine>,
    epoch: u64,
    events: UnboundedSender<SessionEvent>,
}

impl EngineLifecycle {
    pub(crate) fn new(
        factory: Arc<dyn EngineFactory>,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        let epoch = 1;
        let engine = factory.create(Arc::new(ChannelEventSink::new(epoch, events.clone())));
        Self {
            factory,
            engine,
            epoch,
            events,
        }
    }

    pub(crate) fn engine(&self) -> &dyn MediaEngine {
        self.engine.as_ref()
    }

    pub(crate) fn engine_mut(&mut self) -> &mut dyn MediaEngine {
        self.engine.as_mut()
    }

    /// Whether an event tagged with `epoch` came from the current engine.
    pub(crate) fn accepts(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Replace the engine with a fresh instance under a new epoch. The old
    /// instance is dropped; observers must be re-registered by the caller.
    pub(crate) fn recreate(&mut self) {
        self.epoch += 1;
        info!(epoch = self.epoch, "recreating media engine");
        self.engine = self
            .factory
            .create(Arc::new(ChannelEventSink::new(self.epoch, self.events.clone())));
    }
}
