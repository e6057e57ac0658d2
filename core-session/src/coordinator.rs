//! # Session Coordinator
//!
//! Drives one logical playback session through loading, buffering, playing,
//! pausing, seeking, and engine recovery, reconciling asynchronous asset
//! resolution with engine callbacks into a single race-free state machine.
//!
//! ## Control model
//!
//! One control task owns the coordinator; every public operation is a
//! `&mut self` call from that task and every delegate callback is delivered
//! synchronously on it. Background work (resolution tasks, engine
//! callbacks) re-enters through [`SessionEvent`]s on an internal channel:
//! [`dispatch`](SessionCoordinator::dispatch) is the single-threaded
//! re-entry point, and [`process_next_event`](SessionCoordinator::process_next_event)
//! or [`run`](SessionCoordinator::run) drive it. No locking anywhere.
//!
//! ## Race arbitration
//!
//! Two tag checks make overlapping completions safe: a per-`load`
//! generation (only the latest load's resolution may attach or notify) and
//! a per-engine epoch (a replaced engine's callbacks are dropped). Both are
//! authoritative; cancellation of in-flight work is only an optimization.

use crate::config::{SessionConfig, TimeEventFrequency};
use crate::delegate::SessionDelegate;
use crate::error::{Result, SessionError};
use crate::events::{ResolutionOutcome, SessionEvent};
use crate::lifecycle::EngineLifecycle;
use crate::loader::SourceLoader;
use crate::preload::{PreloadCache, PreloadEntry};
use crate::state::PlaybackState;
use crate::timing::TimeEventDispatcher;
use bridge_engine::{
    AssetResolver, EngineEvent, EngineFactory, ItemStatus, MediaItem, MediaSource, PlayableAsset,
    TimingStatus,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, instrument, warn};

/// What the preload cache had for a source at `load` time.
enum CachedLookup {
    Attach(PlayableAsset),
    Refetch,
    Adopt,
    Miss,
}

/// Coordinator for a single playback session.
pub struct SessionCoordinator {
    config: SessionConfig,
    state: PlaybackState,
    play_when_ready: bool,
    /// Pending initial-time seek; consumed exactly once, by the completion
    /// of the seek it triggers, or superseded by a new `load`.
    initial_seek: Option<Duration>,
    lifecycle: EngineLifecycle,
    loader: SourceLoader,
    preload: PreloadCache,
    timing: TimeEventDispatcher,
    delegate: Box<dyn SessionDelegate>,
    events_rx: UnboundedReceiver<SessionEvent>,
}

impl SessionCoordinator {
    /// Build a coordinator with its first engine instance.
    pub fn new(
        factory: Arc<dyn EngineFactory>,
        resolver: Arc<dyn AssetResolver>,
        delegate: Box<dyn SessionDelegate>,
        config: SessionConfig,
    ) -> Result<Self> {
        config.validate().map_err(SessionError::Internal)?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let lifecycle = EngineLifecycle::new(factory, events_tx.clone());
        let loader = SourceLoader::new(Arc::clone(&resolver), events_tx.clone());
        let preload = PreloadCache::new(resolver, events_tx);
        let timing = TimeEventDispatcher::new(config.time_event_frequency);

        let mut coordinator = Self {
            config,
            state: PlaybackState::Idle,
            play_when_ready: true,
            initial_seek: None,
            lifecycle,
            loader,
            preload,
            timing,
            delegate,
            events_rx,
        };
        coordinator.apply_engine_config();
        coordinator
            .timing
            .register_periodic(coordinator.lifecycle.engine_mut());
        Ok(coordinator)
    }

    // ========================================================================
    // Event pump
    // ========================================================================

    /// Receive and dispatch one marshalled event. Returns `false` once the
    /// channel is closed (which only happens during teardown).
    pub async fn process_next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Drive the event pump until teardown.
    pub async fn run(&mut self) {
        while self.process_next_event().await {}
    }

    /// Dispatch one already-queued event without waiting. Returns `false`
    /// when the queue is empty. For hosts that pump from their own loop.
    pub fn try_process_next_event(&mut self) -> bool {
        match self.events_rx.try_recv() {
            Ok(event) => {
                self.dispatch(event);
                true
            }
            Err(_) => false,
        }
    }

    /// Single-threaded re-entry point for marshalled events.
    pub fn dispatch(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Engine { epoch, event } => {
                if !self.lifecycle.accepts(epoch) {
                    debug!(epoch, "dropping event from replaced engine");
                    return;
                }
                self.handle_engine_event(event);
            }
            SessionEvent::LoadResolved {
                generation,
                outcome,
            } => self.handle_load_resolved(generation, outcome),
            SessionEvent::PreloadResolved { id, outcome } => {
                self.handle_preload_resolved(id, outcome)
            }
        }
    }

    // ========================================================================
    // Preloading
    // ========================================================================

    /// Begin best-effort background resolution of `source`. Idempotent;
    /// failures are silent until the source is actively loaded.
    pub fn preload(&mut self, source: MediaSource) {
        self.preload.preload(source);
    }

    /// Cancel a preload and drop its cache entry. No-op when absent. If an
    /// active `load` adopted this preload's resolution, that load is
    /// abandoned too.
    pub fn cancel_preload(&mut self, id: &str) {
        self.preload.cancel(id);
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Load `source` as the session's active item, superseding any load
    /// still in flight. The engine's current item keeps rendering until the
    /// new one is ready (soft reset); only the failure of the *current*
    /// item forces the engine to be rebuilt first.
    #[instrument(skip(self, source), fields(source = %source.id()))]
    pub fn load(
        &mut self,
        source: MediaSource,
        play_when_ready: bool,
        initial_time: Option<Duration>,
    ) {
        info!(play_when_ready, ?initial_time, "loading source");
        self.soft_reset();
        self.play_when_ready = play_when_ready;
        self.initial_seek = initial_time;
        if initial_time.is_some() {
            // Hold playback until the initial seek lands.
            self.lifecycle.engine_mut().pause();
        }

        if self.lifecycle.engine().current_item_status() == Some(ItemStatus::Failed) {
            self.recreate_engine();
        }

        let id = source.id().to_string();
        self.loader.begin(source);

        let lookup = match self.preload.lookup(&id) {
            Some(PreloadEntry::Loaded(asset)) => CachedLookup::Attach(asset.clone()),
            Some(PreloadEntry::Failed) => CachedLookup::Refetch,
            Some(PreloadEntry::Resolving { .. }) => CachedLookup::Adopt,
            None => CachedLookup::Miss,
        };
        match lookup {
            CachedLookup::Attach(asset) => {
                debug!(id, "attaching preloaded asset");
                self.attach(asset);
            }
            CachedLookup::Refetch => {
                debug!(id, "preloaded asset failed, re-resolving");
                self.preload.discard(&id);
                self.loader.spawn_resolution();
            }
            CachedLookup::Adopt => self.loader.adopt_preload(&id),
            CachedLookup::Miss => self.loader.spawn_resolution(),
        }
    }

    // ========================================================================
    // Transport
    // ========================================================================

    pub fn play(&mut self) {
        self.lifecycle.engine_mut().play();
    }

    pub fn pause(&mut self) {
        self.lifecycle.engine_mut().pause();
    }

    /// Pause when advancing (or trying to), play when paused. Total over
    /// the closed [`TimingStatus`] set.
    pub fn toggle_playing(&mut self) {
        match self.lifecycle.engine().timing_status() {
            TimingStatus::Playing | TimingStatus::WaitingToPlayAtSpecifiedRate => self.pause(),
            TimingStatus::Paused => self.play(),
        }
    }

    /// Pause and hard-reset: detach the item, cancel any pending
    /// resolution, drop transient per-load state. Idempotent.
    pub fn stop(&mut self) {
        info!("stopping session");
        self.lifecycle.engine_mut().pause();
        self.soft_reset();
        self.lifecycle.engine_mut().replace_current_item(None);
    }

    /// Frame-accurate seek. Completion is reported through
    /// [`SessionDelegate::on_seek_completed`] once the engine confirms it.
    pub fn seek(&mut self, target: Duration) {
        self.lifecycle
            .engine_mut()
            .seek(target, Duration::ZERO, Duration::ZERO);
    }

    /// Pause automatically when the playhead reaches `target`. Replaces any
    /// prior registration; at most one is ever outstanding.
    pub fn pause_on_time(&mut self, target: Duration) {
        self.timing
            .set_boundary_pause(self.lifecycle.engine_mut(), target);
    }

    /// Remove the pause-at-time registration, if any.
    pub fn clear_pause_on_time(&mut self) {
        self.timing.clear_boundary_pause(self.lifecycle.engine_mut());
    }

    // ========================================================================
    // Accessors & configuration
    // ========================================================================

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current playhead position.
    pub fn position(&self) -> Duration {
        self.lifecycle.engine().position()
    }

    /// Best known duration: the resolver's hint, else the engine's, else
    /// the furthest buffered position, else zero.
    pub fn duration(&self) -> Duration {
        let engine = self.lifecycle.engine();
        if let Some(duration) = engine.current_item().and_then(|item| item.asset().duration()) {
            return duration;
        }
        if let Some(duration) = engine.duration() {
            return duration;
        }
        engine.buffered_position()
    }

    /// End of the furthest buffered range.
    pub fn buffered_position(&self) -> Duration {
        self.lifecycle.engine().buffered_position()
    }

    pub fn volume(&self) -> f32 {
        self.config.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.config.volume = volume.clamp(0.0, 1.0);
        let volume = self.config.volume;
        self.lifecycle.engine_mut().set_volume(volume);
    }

    pub fn is_muted(&self) -> bool {
        self.config.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.config.muted = muted;
        self.lifecycle.engine_mut().set_muted(muted);
    }

    pub fn rate(&self) -> f32 {
        self.config.rate
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.config.rate = rate;
        self.lifecycle.engine_mut().set_rate(rate);
    }

    pub fn auto_wait_to_minimize_stalling(&self) -> bool {
        self.config.auto_wait_to_minimize_stalling
    }

    pub fn set_auto_wait_to_minimize_stalling(&mut self, auto_wait: bool) {
        self.config.auto_wait_to_minimize_stalling = auto_wait;
        self.lifecycle
            .engine_mut()
            .set_auto_wait_to_minimize_stalling(auto_wait);
    }

    pub fn preferred_buffer_duration(&self) -> Duration {
        self.config.preferred_buffer_duration
    }

    /// Applied to the next attached item.
    pub fn set_preferred_buffer_duration(&mut self, duration: Duration) {
        self.config.preferred_buffer_duration = duration;
    }

    pub fn time_event_frequency(&self) -> TimeEventFrequency {
        self.config.time_event_frequency
    }

    pub fn set_time_event_frequency(&mut self, frequency: TimeEventFrequency) {
        self.config.time_event_frequency = frequency;
        self.timing
            .set_frequency(self.lifecycle.engine_mut(), frequency);
    }

    /// Tear the session down: cancel all resolutions, remove every time
    /// observer, detach the item. The delegate receives nothing further.
    pub fn shutdown(&mut self) {
        info!("shutting down playback session");
        self.loader.cancel_pending();
        self.preload.clear();
        self.timing.unregister_all(self.lifecycle.engine_mut());
        self.lifecycle.engine_mut().pause();
        self.lifecycle.engine_mut().replace_current_item(None);
    }

    // ========================================================================
    // Internal: resets, attach, engine replacement
    // ========================================================================

    /// Drop transient per-load state without detaching the current item,
    /// so the last frame/audio holds until the new item is ready. The
    /// superseded item keeps rendering but is no longer observed: nothing
    /// it emits may reach the delegate.
    fn soft_reset(&mut self) {
        self.timing.disarm_started_detection();
        self.timing.stop_item_observation();
        self.loader.cancel_pending();
        self.initial_seek = None;
    }

    /// Attach a resolved, still-current asset to the engine.
    fn attach(&mut self, asset: PlayableAsset) {
        debug!(source = asset.source().id(), "attaching item");
        self.loader.finish();
        let item = MediaItem::new(asset)
            .with_preferred_buffer_duration(self.config.preferred_buffer_duration);
        self.lifecycle.engine_mut().replace_current_item(Some(item));
        // Resume item observation and arm the progress-based started
        // detection for the new item.
        self.timing.start_item_observation();
        self.timing.arm_started_detection();
    }

    /// Full engine replacement after an unrecoverable item failure: fresh
    /// instance, fresh epoch, observers re-registered, tracked engine
    /// configuration re-applied, delegate informed.
    fn recreate_engine(&mut self) {
        self.lifecycle.recreate();
        self.timing.forget_engine();
        self.timing.register_periodic(self.lifecycle.engine_mut());
        self.apply_engine_config();
        self.delegate.on_engine_recreated();
    }

    fn apply_engine_config(&mut self) {
        let engine = self.lifecycle.engine_mut();
        engine.set_auto_wait_to_minimize_stalling(self.config.auto_wait_to_minimize_stalling);
        engine.set_volume(self.config.volume);
        engine.set_muted(self.config.muted);
        engine.set_rate(self.config.rate);
    }

    /// Explicit compare-and-emit state setter: the delegate hears about a
    /// transition iff the value actually changed.
    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(old = %self.state, new = %state, "playback state changed");
            self.state = state;
            self.delegate.on_state_changed(state);
        }
    }

    // ========================================================================
    // Internal: event handling
    // ========================================================================

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TimingStatusChanged(status) => self.handle_timing_status(status),
            EngineEvent::ItemStatusChanged(status) => self.handle_item_status(status),
            EngineEvent::PeriodicTick(position) => {
                if self.timing.take_started_signal() {
                    // Progress confirmed; covers engines that never report
                    // a playing timing status promptly.
                    self.set_state(PlaybackState::Playing);
                }
                self.delegate.on_time_elapsed(position);
            }
            EngineEvent::BoundaryReached(token) => {
                if self.timing.is_boundary_pause(token) {
                    self.lifecycle.engine_mut().pause();
                }
            }
            EngineEvent::SeekCompleted { target, completed } => {
                if self.initial_seek.take().is_some() && self.play_when_ready {
                    self.lifecycle.engine_mut().play();
                }
                self.delegate.on_seek_completed(target, completed);
            }
            EngineEvent::DurationChanged(duration) => {
                if self.timing.is_observing_item() {
                    self.delegate.on_duration_updated(duration);
                }
            }
            EngineEvent::PlayedToEnd => {
                if self.timing.is_observing_item() {
                    self.delegate.on_played_to_end();
                }
            }
        }
    }

    fn handle_timing_status(&mut self, status: TimingStatus) {
        match status {
            TimingStatus::Paused => {
                if self.lifecycle.engine().current_item().is_none() {
                    self.set_state(PlaybackState::Idle);
                } else {
                    self.set_state(PlaybackState::Paused);
                }
            }
            TimingStatus::WaitingToPlayAtSpecifiedRate => self.set_state(PlaybackState::Loading),
            TimingStatus::Playing => self.set_state(PlaybackState::Playing),
        }
    }

    fn handle_item_status(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::ReadyToPlay => {
                self.set_state(PlaybackState::Ready);
                if let Some(target) = self.initial_seek {
                    self.lifecycle
                        .engine_mut()
                        .seek(target, Duration::ZERO, Duration::ZERO);
                } else if self.play_when_ready {
                    self.lifecycle.engine_mut().play();
                }
            }
            ItemStatus::Failed => {
                // The engine itself is rebuilt on the next load, not here.
                let error =
                    SessionError::EngineItemFailed("current item entered failed status".into());
                warn!(%error, "engine item failed");
                self.delegate.on_failed(&error);
            }
            ItemStatus::Unknown => {}
        }
    }

    fn handle_load_resolved(&mut self, generation: u64, outcome: ResolutionOutcome) {
        if !self.loader.accepts(generation) {
            debug!(generation, "discarding stale resolution");
            return;
        }
        match outcome {
            ResolutionOutcome::Loaded(asset) => self.attach(asset),
            ResolutionOutcome::Failed(err) => {
                self.loader.finish();
                let error = SessionError::ResolutionFailed(err.to_string());
                warn!(%error, "active load failed");
                self.delegate.on_failed(&error);
            }
            ResolutionOutcome::Cancelled => {}
        }
    }

    fn handle_preload_resolved(&mut self, id: String, outcome: ResolutionOutcome) {
        self.preload.on_resolved(&id, &outcome);
        if !self.loader.has_adopted(&id) {
            return;
        }
        // The active load adopted this resolution; its outcome is the
        // load's outcome.
        match outcome {
            ResolutionOutcome::Loaded(asset) => self.attach(asset),
            ResolutionOutcome::Failed(err) => {
                self.loader.finish();
                let error = SessionError::ResolutionFailed(err.to_string());
                warn!(%error, "adopted preload failed");
                self.delegate.on_failed(&error);
            }
            ResolutionOutcome::Cancelled => {
                // cancel_preload on an adopted entry abandons the load too.
                self.loader.finish();
            }
        }
    }
}
