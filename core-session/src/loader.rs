//! Active-load resolution with race-safe supersession.
//!
//! Every `load` call bumps a monotonically increasing generation counter
//! and captures it into the spawned resolution. A completion is accepted
//! only while its generation still matches — so when loads arrive in quick
//! succession, only the last call's resolution can win, no matter how the
//! completions interleave. Cancellation of the superseded resolution is
//! requested too, but purely as an optimization to stop wasted work.

use crate::events::{ResolutionOutcome, SessionEvent};
use bridge_engine::{AssetResolver, MediaSource};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The source currently being resolved or attached. At most one exists.
pub(crate) struct PendingLoad {
    source: MediaSource,
    generation: u64,
    cancel: Option<CancellationToken>,
    /// Set when this load adopted an in-flight preload resolution instead
    /// of spawning its own.
    adopted_preload: Option<String>,
}

impl PendingLoad {
    #[cfg(test)]
    pub(crate) fn source(&self) -> &MediaSource {
        &self.source
    }
}

pub(crate) struct SourceLoader {
    generation: u64,
    pending: Option<PendingLoad>,
    resolver: Arc<dyn AssetResolver>,
    events: UnboundedSender<SessionEvent>,
}

impl SourceLoader {
    pub(crate) fn new(
        resolver: Arc<dyn AssetResolver>,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            generation: 0,
            pending: None,
            resolver,
            events,
        }
    }

    /// Supersede any outstanding load and start tracking a new one.
    /// Resolution is not spawned yet; the caller decides between a fresh
    /// resolution, adoption of a preload, or an immediate attach.
    pub(crate) fn begin(&mut self, source: MediaSource) -> u64 {
        self.cancel_pending();
        self.generation += 1;
        self.pending = Some(PendingLoad {
            source,
            generation: self.generation,
            cancel: None,
            adopted_preload: None,
        });
        self.generation
    }

    /// Spawn the asynchronous resolution for the pending load.
    pub(crate) fn spawn_resolution(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let cancel = CancellationToken::new();
        pending.cancel = Some(cancel.clone());

        let source = pending.source.clone();
        let generation = pending.generation;
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
            let _ = events.send(SessionEvent::LoadResolved {
                generation,
                outcome,
            });
        });
    }

    /// Mark the pending load as waiting on an in-flight preload resolution
    /// instead of its own task.
    pub(crate) fn adopt_preload(&mut self, id: &str) {
        if let Some(pending) = self.pending.as_mut() {
            debug!(id, generation = pending.generation, "adopting in-flight preload");
            pending.adopted_preload = Some(id.to_string());
        }
    }

    /// Whether the pending load is waiting on the preload entry `id`.
    pub(crate) fn has_adopted(&self, id: &str) -> bool {
        self.pending
            .as_ref()
            .and_then(|p| p.adopted_preload.as_deref())
            == Some(id)
    }

    /// Whether a completion carrying `generation` belongs to the load the
    /// caller still wants.
    pub(crate) fn accepts(&self, generation: u64) -> bool {
        self.pending
            .as_ref()
            .map(|p| p.generation == generation)
            .unwrap_or(false)
    }

    /// Clear the pending load once its outcome has been acted upon.
    pub(crate) fn finish(&mut self) {
        self.pending = None;
    }

    /// Request cancellation of the outstanding resolution and forget it.
    pub(crate) fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            if let Some(cancel) = pending.cancel {
                cancel.cancel();
            }
            debug!(generation = pending.generation, "pending load superseded");
        }
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> Option<&PendingLoad> {
        self.pending.as_ref()
    }
}
