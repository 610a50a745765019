//! Audio registry and page observer plumbing.
//!
//! Consumes the embedder's structural change notifications and keeps one
//! forwarding task per live audio element, turning its lifecycle signals
//! into engine events. A handle whose signal stream ends has left the page;
//! its forwarder simply finishes, no explicit detach needed.

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::audio::{AudioId, RealAudio};
use crate::engine::EngineEvent;
use crate::page::{PageMutation, PageRole};

/// Tracks live audio elements and forwards their signals to the engine.
pub(crate) struct AudioRegistry {
    engine_tx: mpsc::UnboundedSender<EngineEvent>,
    forwarders: HashMap<AudioId, JoinHandle<()>>,
}

impl AudioRegistry {
    pub(crate) fn new(engine_tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self {
            engine_tx,
            forwarders: HashMap::new(),
        }
    }

    /// Consume page mutations until the embedder drops its sender.
    pub(crate) async fn run(mut self, mut mutations: mpsc::UnboundedReceiver<PageMutation>) {
        while let Some(mutation) = mutations.recv().await {
            self.apply(mutation);
        }
        debug!("page mutation stream closed");
    }

    fn apply(&mut self, mutation: PageMutation) {
        match mutation {
            PageMutation::AudioAttached(handle) => self.attach(handle),
            PageMutation::AudioDetached(id) => {
                if let Some(task) = self.forwarders.remove(&id) {
                    task.abort();
                    trace!(%id, "audio element detached");
                }
            }
            PageMutation::ControlDetached(PageRole::PlayToggle) => {
                let _ = self.engine_tx.send(EngineEvent::IndicatorLost);
            }
            PageMutation::ControlDetached(role) => {
                trace!(?role, "control detached, no state impact");
            }
        }
    }

    fn attach(&mut self, handle: Arc<dyn RealAudio>) {
        let id = handle.id();
        let engine_tx = self.engine_tx.clone();

        let task = tokio::spawn(async move {
            let mut signals = handle.signals();
            while let Some(signal) = signals.next().await {
                if engine_tx
                    .send(EngineEvent::RealAudio { id, signal })
                    .is_err()
                {
                    break;
                }
            }
            trace!(%id, "audio signal stream ended");
        });

        debug!(%id, "audio element attached");
        if let Some(previous) = self.forwarders.insert(id, task) {
            previous.abort();
        }
    }
}

impl Drop for AudioRegistry {
    fn drop(&mut self) {
        for (_, task) in self.forwarders.drain() {
            task.abort();
        }
    }
}
