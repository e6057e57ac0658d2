//! Time-event bookkeeping: periodic ticks, the single boundary-pause
//! target, and playback-started detection.
//!
//! The engine owns the actual timers; this dispatcher owns the tokens and
//! the rules — one periodic observer per engine instance, at most one
//! boundary-pause registration, a "first tick after attach means media is
//! actually advancing" flag for engines that do not reliably report a
//! playing status promptly, and an item-observation flag that suppresses
//! duration/end-of-media events from a superseded item while a new source
//! resolves.

use crate::config::TimeEventFrequency;
use bridge_engine::{MediaEngine, ObserverToken};
use std::time::Duration;

pub(crate) struct TimeEventDispatcher {
    frequency: TimeEventFrequency,
    periodic_token: Option<ObserverToken>,
    boundary_pause_token: Option<ObserverToken>,
    awaiting_first_tick: bool,
    observing_item: bool,
}

impl TimeEventDispatcher {
    pub(crate) fn new(frequency: TimeEventFrequency) -> Self {
        Self {
            frequency,
            periodic_token: None,
            boundary_pause_token: None,
            awaiting_first_tick: false,
            observing_item: false,
        }
    }

    /// Register the periodic progress observer on `engine`, replacing any
    /// prior registration. Called at engine creation and re-creation.
    pub(crate) fn register_periodic(&mut self, engine: &mut dyn MediaEngine) {
        if let Some(token) = self.periodic_token.take() {
            engine.remove_time_observer(token);
        }
        self.periodic_token = Some(engine.add_periodic_time_observer(self.frequency.interval()));
    }

    /// Change the tick frequency and re-register on the current engine.
    pub(crate) fn set_frequency(
        &mut self,
        engine: &mut dyn MediaEngine,
        frequency: TimeEventFrequency,
    ) {
        self.frequency = frequency;
        self.register_periodic(engine);
    }

    /// Tokens held against a replaced engine are meaningless; forget them.
    pub(crate) fn forget_engine(&mut self) {
        self.periodic_token = None;
        self.boundary_pause_token = None;
        self.awaiting_first_tick = false;
        self.observing_item = false;
    }

    /// Register the single "pause at `target`" boundary, replacing any
    /// prior registration first so two can never coexist.
    pub(crate) fn set_boundary_pause(&mut self, engine: &mut dyn MediaEngine, target: Duration) {
        self.clear_boundary_pause(engine);
        self.boundary_pause_token = Some(engine.add_boundary_time_observer(vec![target]));
    }

    /// Remove the boundary-pause registration. No-op when none exists.
    pub(crate) fn clear_boundary_pause(&mut self, engine: &mut dyn MediaEngine) {
        if let Some(token) = self.boundary_pause_token.take() {
            engine.remove_time_observer(token);
        }
    }

    /// Whether `token` is the boundary-pause registration.
    pub(crate) fn is_boundary_pause(&self, token: ObserverToken) -> bool {
        self.boundary_pause_token == Some(token)
    }

    /// Arm started-detection: the next periodic tick confirms that media is
    /// actually advancing.
    pub(crate) fn arm_started_detection(&mut self) {
        self.awaiting_first_tick = true;
    }

    pub(crate) fn disarm_started_detection(&mut self) {
        self.awaiting_first_tick = false;
    }

    /// Begin forwarding item-level events (duration, end-of-media) for a
    /// freshly attached item.
    pub(crate) fn start_item_observation(&mut self) {
        self.observing_item = true;
    }

    /// Stop forwarding item-level events. A superseded item stays attached
    /// during a soft reset, but nothing it emits may reach the delegate.
    pub(crate) fn stop_item_observation(&mut self) {
        self.observing_item = false;
    }

    pub(crate) fn is_observing_item(&self) -> bool {
        self.observing_item
    }

    /// Consume the started signal. Returns `true` exactly once per arming,
    /// on the first tick after it.
    pub(crate) fn take_started_signal(&mut self) -> bool {
        std::mem::take(&mut self.awaiting_first_tick)
    }

    pub(crate) fn unregister_all(&mut self, engine: &mut dyn MediaEngine) {
        if let Some(token) = self.periodic_token.take() {
            engine.remove_time_observer(token);
        }
        self.clear_boundary_pause(engine);
        self.awaiting_first_tick = false;
        self.observing_item = false;
    }
}
