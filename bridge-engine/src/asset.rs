//! Asset resolution traits and source descriptors.
//!
//! A [`MediaSource`] names where media comes from; an [`AssetResolver`]
//! turns it into a [`PlayableAsset`] the engine can attach. Resolution is
//! asynchronous and may involve network or metadata loading; the session
//! core treats cancellation as best-effort and guards against stale
//! completions itself.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// One media origin: an absolute source URL plus optional request headers.
///
/// Identity is the URL string; two sources with the same URL address the
/// same preload-cache entry regardless of headers. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    url: String,
    #[serde(default)]
    headers: HashMap<String, String>,
}

impl MediaSource {
    /// Create a source from an absolute URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Attach HTTP headers the host should send when fetching this source.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Stable identity of this source.
    pub fn id(&self) -> &str {
        &self.url
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

/// A resolved, playable handle for a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableAsset {
    source: MediaSource,
    duration: Option<Duration>,
}

impl PlayableAsset {
    /// Create a playable asset for the given source.
    pub fn new(source: MediaSource) -> Self {
        Self {
            source,
            duration: None,
        }
    }

    /// Attach a duration hint discovered during resolution.
    pub fn with_duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }

    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    /// Duration reported by the resolver, when known.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

/// Asynchronous asset-resolution provider.
///
/// Implementations load whatever the platform needs before a source becomes
/// playable (network handshake, container metadata, playability keys). The
/// core may race several resolutions and discard results for superseded
/// requests; `resolve` must therefore be side-effect free with respect to
/// playback itself.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// Resolve a source into a playable asset.
    async fn resolve(&self, source: &MediaSource) -> Result<PlayableAsset>;
}
