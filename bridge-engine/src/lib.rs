//! # Host Engine Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host media
//! engine integration.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback session core and the
//! underlying media engine (decoder, renderer, audio routing). The core never
//! talks to a concrete engine; each host platform ships adapters for the
//! traits below and the core drives them through a single control task.
//!
//! ## Traits
//!
//! - [`MediaEngine`](engine::MediaEngine) - Transport surface of the
//!   underlying player (attach item, play/pause/seek, time observers,
//!   volume/rate/mute accessors)
//! - [`EngineFactory`](engine::EngineFactory) - Builds fresh engine
//!   instances; the core uses this to replace an engine whose current item
//!   entered a failed status
//! - [`EngineEventSink`](engine::EngineEventSink) - Callback seam through
//!   which an engine delivers status and time events back to the core
//! - [`AssetResolver`](asset::AssetResolver) - Asynchronous resolution of a
//!   [`MediaSource`](asset::MediaSource) into a playable handle
//!
//! ## Threading Model
//!
//! [`MediaEngine`] implementations are owned and driven by one control task
//! and only need `Send`. [`EngineEventSink`] and [`AssetResolver`] are
//! invoked from arbitrary background contexts and require `Send + Sync`;
//! event delivery must not assume it runs on the control task.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Adapters
//! should convert platform-specific errors into `BridgeError` with
//! actionable messages; a platform transport status that cannot be mapped
//! onto [`TimingStatus`](engine::TimingStatus) must be surfaced as
//! [`BridgeError::InvalidTransportStatus`] rather than guessed at.

pub mod asset;
pub mod engine;
pub mod error;

pub use error::BridgeError;

// Re-export commonly used types
pub use asset::{AssetResolver, MediaSource, PlayableAsset};
pub use engine::{
    EngineEvent, EngineEventSink, EngineFactory, ItemStatus, MediaEngine, MediaItem,
    ObserverToken, TimingStatus,
};
