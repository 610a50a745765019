//! Runtime wiring of the reconciliation engine.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_stream::stream;
use futures::Stream;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, instrument};

use crate::audio::StubAudio;
use crate::config::BridgeConfig;
use crate::engine::{BridgeEvent, ControlAction, EngineEvent, Reconciler};
use crate::error::{BridgeError, Result};
use crate::page::{PageMutation, PageSurface};
use crate::reactive::Property;
use crate::registry::AudioRegistry;
use crate::surface::{MediaSurface, PlaybackState, SessionMetadata};

/// The wired reconciliation runtime.
///
/// Owns the engine loop, the page-mutation registry, and the two interval
/// tickers as background tasks; all of them run for the lifetime of the
/// bridge and are aborted on [`shutdown`](SessionBridge::shutdown) or drop.
/// The only intended shutdown in production is page teardown.
pub struct SessionBridge {
    engine_tx: mpsc::UnboundedSender<EngineEvent>,
    events_tx: broadcast::Sender<BridgeEvent>,
    playback: Property<Option<PlaybackState>>,
    metadata: Property<Option<SessionMetadata>>,
    tasks: Vec<JoinHandle<()>>,
}

impl SessionBridge {
    /// Wire an engine over the collaborator boundaries and start it.
    ///
    /// `mutations` is the embedder's structural-change feed; dropping its
    /// sender stops observation but leaves the periodic ticks running.
    /// Ticking begins after the configured startup settle period.
    #[instrument(skip_all)]
    pub fn new(
        page: Arc<dyn PageSurface>,
        stub_audio: Arc<dyn StubAudio>,
        surface: Arc<dyn MediaSurface>,
        mutations: mpsc::UnboundedReceiver<PageMutation>,
        config: BridgeConfig,
    ) -> Self {
        let (engine_tx, mut engine_rx) = mpsc::unbounded_channel();

        let mut engine = Reconciler::new(page, stub_audio, surface, config.clone());
        let events_tx = engine.events_channel();
        let playback = engine.playback();
        let metadata = engine.metadata();

        let mut tasks = Vec::with_capacity(4);

        tasks.push(tokio::spawn(async move {
            while let Some(event) = engine_rx.recv().await {
                engine.step(event, Instant::now()).await;
            }
            debug!("engine queue closed");
        }));

        tasks.push(tokio::spawn(
            AudioRegistry::new(engine_tx.clone()).run(mutations),
        ));

        tasks.push(tokio::spawn(run_ticker(
            engine_tx.clone(),
            config.startup_delay,
            config.playback_tick,
            || EngineEvent::PlaybackTick,
        )));
        tasks.push(tokio::spawn(run_ticker(
            engine_tx.clone(),
            config.startup_delay,
            config.metadata_tick,
            || EngineEvent::MetadataTick,
        )));

        debug!(?config, "session bridge started");

        Self {
            engine_tx,
            events_tx,
            playback,
            metadata,
            tasks,
        }
    }

    /// Handle for the platform's transport-control callbacks.
    pub fn controls(&self) -> ControlHandle {
        ControlHandle {
            engine_tx: self.engine_tx.clone(),
        }
    }

    /// Last playback state published to the platform.
    pub fn playback(&self) -> Property<Option<PlaybackState>> {
        self.playback.clone()
    }

    /// Last metadata record published to the platform.
    pub fn metadata(&self) -> Property<Option<SessionMetadata>> {
        self.metadata.clone()
    }

    /// Everything the bridge publishes or dispatches, as a stream.
    pub fn events(&self) -> impl Stream<Item = BridgeEvent> + Send + use<> {
        let mut rx = self.events_tx.subscribe();

        stream! {
            while let Ok(event) = rx.recv().await {
                yield event;
            }
        }
    }

    /// Stop all background tasks.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for SessionBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cloneable entry point for the platform's four action callbacks.
#[derive(Clone)]
pub struct ControlHandle {
    engine_tx: mpsc::UnboundedSender<EngineEvent>,
}

impl ControlHandle {
    /// Enqueue a transport-control action.
    ///
    /// # Errors
    /// Returns [`BridgeError::Shutdown`] when the bridge is gone.
    pub fn dispatch(&self, action: ControlAction) -> Result<()> {
        self.engine_tx
            .send(EngineEvent::Control(action))
            .map_err(|_| BridgeError::Shutdown)
    }

    /// Best-effort `play` action.
    pub fn play(&self) {
        let _ = self.dispatch(ControlAction::Play);
    }

    /// Best-effort `pause` action.
    pub fn pause(&self) {
        let _ = self.dispatch(ControlAction::Pause);
    }

    /// Best-effort `previous` action.
    pub fn previous(&self) {
        let _ = self.dispatch(ControlAction::Previous);
    }

    /// Best-effort `next` action.
    pub fn next(&self) {
        let _ = self.dispatch(ControlAction::Next);
    }
}

/// Enqueue `event()` every `period` after the startup settle delay.
///
/// Ticks are stateless reads, so missed ones are skipped rather than
/// bursted. The ticker stops once the engine loop is gone.
async fn run_ticker(
    engine_tx: mpsc::UnboundedSender<EngineEvent>,
    settle: Duration,
    period: Duration,
    event: impl Fn() -> EngineEvent,
) {
    time::sleep(settle).await;

    let mut ticks = time::interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticks.tick().await;
        if engine_tx.send(event()).is_err() {
            break;
        }
    }
}
