//! Preload cache: cancellable, best-effort resolution ahead of playback.
//!
//! Entries are keyed by source id and persist across loads — reading a
//! loaded entry does not remove it, so one preload can serve several
//! potential loads. Only `cancel_preload` or the observation of a failed
//! entry by `load` removes one. Preload failures are silent by contract:
//! no delegate callback is ever produced on behalf of a preload.

use crate::events::{ResolutionOutcome, SessionEvent};
use bridge_engine::{AssetResolver, MediaSource, PlayableAsset};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One cached resolution, in whatever stage it is in.
pub(crate) enum PreloadEntry {
    /// Resolution in flight.
    Resolving { cancel: CancellationToken },
    Loaded(PlayableAsset),
    Failed,
}

pub(crate) struct PreloadCache {
    entries: HashMap<String, PreloadEntry>,
    resolver: Arc<dyn AssetResolver>,
    events: UnboundedSender<SessionEvent>,
}

impl PreloadCache {
    pub(crate) fn new(
        resolver: Arc<dyn AssetResolver>,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            resolver,
            events,
        }
    }

    /// Begin resolving `source` in the background. Idempotent: an existing
    /// entry, in any stage, is left untouched.
    pub(crate) fn preload(&mut self, source: MediaSource) {
        let id = source.id().to_string();
        if self.entries.contains_key(&id) {
            debug!(id, "preload already cached, ignoring");
            return;
        }

        let cancel = CancellationToken::new();
        self.entries.insert(
            id.clone(),
            PreloadEntry::Resolving {
                cancel: cancel.clone(),
            },
        );

        let resolver = Arc::clone(&self.resolver);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => ResolutionOutcome::Cancelled,
                resolved = resolver.resolve(&source) => match resolved {
                    Ok(asset) => ResolutionOutcome::Loaded(asset),
                    Err(err) => ResolutionOutcome::Failed(err),
                },
            };
            let _ = events.send(SessionEvent::PreloadResolved { id, outcome });
        });
    }

    /// Cancel an in-flight resolution and drop the entry. No-op when absent.
    pub(crate) fn cancel(&mut self, id: &str) {
        if let Some(entry) = self.entries.remove(id) {
            if let PreloadEntry::Resolving { cancel } = entry {
                cancel.cancel();
            }
            debug!(id, "preload cancelled");
        }
    }

    /// Record a resolution outcome. Outcomes for entries that were cancelled
    /// in the meantime are dropped.
    pub(crate) fn on_resolved(&mut self, id: &str, outcome: &ResolutionOutcome) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        if !matches!(entry, PreloadEntry::Resolving { .. }) {
            return;
        }
        match outcome {
            ResolutionOutcome::Loaded(asset) => {
                *entry = PreloadEntry::Loaded(asset.clone());
            }
            ResolutionOutcome::Failed(err) => {
                // Best-effort and silent: surfaced only if this source is
                // later actively loaded and fails again.
                debug!(id, error = %err, "preload resolution failed");
                *entry = PreloadEntry::Failed;
            }
            ResolutionOutcome::Cancelled => {
                self.entries.remove(id);
            }
        }
    }

    pub(crate) fn lookup(&self, id: &str) -> Option<&PreloadEntry> {
        self.entries.get(id)
    }

    /// Drop an entry without cancelling; used when `load` observes a failed
    /// entry and falls back to fresh resolution.
    pub(crate) fn discard(&mut self, id: &str) {
        self.entries.remove(id);
    }

    /// Cancel every in-flight resolution and clear the cache.
    pub(crate) fn clear(&mut self) {
        for (_, entry) in self.entries.drain() {
            if let PreloadEntry::Resolving { cancel } = entry {
                cancel.cancel();
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
