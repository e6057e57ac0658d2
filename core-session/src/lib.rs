//! # Playback Session Core
//!
//! A playback-state coordinator sitting between a host media engine and a
//! consumer application. It drives a single logical playback session
//! through loading, buffering, playing, pausing, seeking, and engine
//! recovery, reconciling asynchronous asset resolution and engine
//! callbacks into one consistent state machine exposed to a single
//! delegate.
//!
//! ## Overview
//!
//! This crate handles:
//! - The canonical playback state machine, driven only by engine callbacks
//! - Asynchronous source loading with race-safe supersession (generation
//!   counters) and a cancellable preload cache
//! - Periodic progress ticks, a single pause-at-time boundary target, and
//!   playback-started detection
//! - Transparent engine replacement after an unrecoverable item failure
//!
//! The engine itself (decode, render, routing) lives behind the traits in
//! [`bridge_engine`]; hosts supply `MediaEngine`/`EngineFactory`/
//! `AssetResolver` adapters and a [`SessionDelegate`].

pub mod config;
pub mod coordinator;
pub mod delegate;
pub mod error;
pub mod events;
pub mod state;

mod lifecycle;
mod loader;
mod preload;
mod timing;

pub use config::{SessionConfig, TimeEventFrequency};
pub use coordinator::SessionCoordinator;
pub use delegate::{NoopDelegate, SessionDelegate};
pub use error::{Result, SessionError};
pub use events::{ResolutionOutcome, SessionEvent};
pub use state::PlaybackState;

// Hosts implement these; re-exported for convenience.
pub use bridge_engine::{
    AssetResolver, BridgeError, EngineEvent, EngineEventSink, EngineFactory, ItemStatus,
    MediaEngine, MediaItem, MediaSource, ObserverToken, PlayableAsset, TimingStatus,
};
