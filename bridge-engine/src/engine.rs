//! Media engine bridge traits and supporting types.
//!
//! These abstractions let the session core drive a platform media engine
//! while staying race-free: every engine callback travels through an
//! [`EngineEventSink`] and is re-entered on the core's control task, and
//! engine replacement goes through an [`EngineFactory`] so a failed engine
//! can be rebuilt without the core knowing the concrete type.

use crate::asset::PlayableAsset;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Opaque handle for a registered time observer.
///
/// Tokens are only meaningful to the engine that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(u64);

impl ObserverToken {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Transport timing status reported by the engine.
///
/// The set is closed: an adapter that cannot map a platform status onto one
/// of these variants must fail at the bridge boundary
/// ([`crate::BridgeError::InvalidTransportStatus`]) instead of inventing a
/// mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingStatus {
    Paused,
    WaitingToPlayAtSpecifiedRate,
    Playing,
}

/// Readiness status of the engine's current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    /// Item attached but readiness not yet determined.
    Unknown,
    /// Item can be played.
    ReadyToPlay,
    /// Item entered an unrecoverable failed status.
    Failed,
}

/// A playable item ready to be attached to the engine.
#[derive(Debug, Clone)]
pub struct MediaItem {
    asset: PlayableAsset,
    preferred_buffer_duration: Duration,
}

impl MediaItem {
    /// Build an item from a resolved asset.
    pub fn new(asset: PlayableAsset) -> Self {
        Self {
            asset,
            preferred_buffer_duration: Duration::ZERO,
        }
    }

    /// Hint how much media the engine should keep buffered ahead of the
    /// playhead. Zero lets the engine choose.
    pub fn with_preferred_buffer_duration(mut self, duration: Duration) -> Self {
        self.preferred_buffer_duration = duration;
        self
    }

    pub fn asset(&self) -> &PlayableAsset {
        &self.asset
    }

    pub fn preferred_buffer_duration(&self) -> Duration {
        self.preferred_buffer_duration
    }
}

/// Event emitted by a media engine.
///
/// Engines emit these from whatever execution context they like; the sink
/// marshals them onto the core's control task.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Transport timing status changed.
    TimingStatusChanged(TimingStatus),
    /// The current item's readiness status changed.
    ItemStatusChanged(ItemStatus),
    /// Periodic progress tick with the current position.
    PeriodicTick(Duration),
    /// A registered boundary time was crossed.
    BoundaryReached(ObserverToken),
    /// An issued seek finished. `completed` is false when the seek was
    /// interrupted by another seek or a reset.
    SeekCompleted { target: Duration, completed: bool },
    /// The current item's duration became known or changed.
    DurationChanged(Duration),
    /// The current item played to its end.
    PlayedToEnd,
}

/// Callback seam through which an engine delivers events.
pub trait EngineEventSink: Send + Sync {
    /// Deliver one event. Must be cheap and non-blocking; implementations
    /// queue the event for the control task.
    fn deliver(&self, event: EngineEvent);
}

/// Transport surface of the underlying media engine.
///
/// One engine instance owns at most one attached item. All methods are
/// invoked from the core's control task; results of asynchronous work
/// (seek completion, status changes, time ticks) come back through the
/// [`EngineEventSink`] the engine was created with.
pub trait MediaEngine: Send {
    /// Replace the current item, or detach it with `None`. Detaching stops
    /// playback output but does not reset volume/rate/mute.
    fn replace_current_item(&mut self, item: Option<MediaItem>);

    /// The currently attached item, if any.
    fn current_item(&self) -> Option<&MediaItem>;

    /// Readiness status of the current item; `None` when nothing is attached.
    fn current_item_status(&self) -> Option<ItemStatus>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Seek to `target`. Completion is delivered as
    /// [`EngineEvent::SeekCompleted`]. Zero tolerances request a
    /// frame-accurate seek.
    fn seek(&mut self, target: Duration, tolerance_before: Duration, tolerance_after: Duration);

    /// Register a periodic progress observer firing roughly every `interval`
    /// while media is advancing.
    fn add_periodic_time_observer(&mut self, interval: Duration) -> ObserverToken;

    /// Register a one-shot-per-crossing boundary observer for the given
    /// times.
    fn add_boundary_time_observer(&mut self, times: Vec<Duration>) -> ObserverToken;

    /// Remove a periodic or boundary observer. Unknown tokens are a no-op.
    fn remove_time_observer(&mut self, token: ObserverToken);

    fn timing_status(&self) -> TimingStatus;

    /// Current playhead position. Zero when nothing is attached.
    fn position(&self) -> Duration;

    /// Duration of the current item as known to the engine.
    fn duration(&self) -> Option<Duration>;

    /// End of the furthest buffered range. Zero when nothing is buffered.
    fn buffered_position(&self) -> Duration;

    fn rate(&self) -> f32;
    fn set_rate(&mut self, rate: f32);

    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);

    fn is_muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);

    /// Whether the engine may delay rate changes to minimize stalling.
    fn auto_wait_to_minimize_stalling(&self) -> bool;
    fn set_auto_wait_to_minimize_stalling(&mut self, auto_wait: bool);
}

/// Builds engine instances.
///
/// The core calls this once at construction and again whenever an engine
/// must be replaced after an unrecoverable item failure. Each instance gets
/// its own sink; events from a replaced instance are discarded by the core.
pub trait EngineFactory: Send + Sync {
    fn create(&self, sink: Arc<dyn EngineEventSink>) -> Box<dyn MediaEngine>;
}
