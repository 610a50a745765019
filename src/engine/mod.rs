//! The playback-state reconciliation engine.
//!
//! One state machine combines three signal sources — the page's own playback
//! indicator, lifecycle signals from real audio elements, and transport
//! requests from the platform — to decide when the stand-in source plays and
//! what the platform control surface shows. All triggers arrive as
//! [`EngineEvent`]s on a single ordered queue and are applied by one step
//! function, which takes the current instant as an argument so any
//! interleaving can be replayed deterministically without real timers.
//!
//! At most one source is intentionally active at a time: either the
//! stand-in carries the session (the real stream is inaccessible) or a real
//! element does. Any real-audio signal pauses the stand-in immediately, and
//! the stand-in only starts again once real audio has been quiet for the
//! configured quiescence window — without that window the control surface
//! visibly stops and restarts on every track change as the page swaps
//! streams.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::audio::{AudioId, AudioSignal, StubAudio, StubSource};
use crate::config::BridgeConfig;
use crate::metadata::{self, TrackMetadata};
use crate::page::{self, IndicatorState, PageRole, PageSurface};
use crate::reactive::Property;
use crate::surface::{MediaSurface, PlaybackState, SessionMetadata};

/// Transport-control actions and their debounce gate.
pub mod controls;

/// Event types carried on the engine queue and emitted by the bridge.
pub mod events;

#[cfg(test)]
mod tests;

pub use controls::{ControlAction, ControlDispatcher};
pub use events::{BridgeEvent, EngineEvent};

/// Which source currently carries the platform's media session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// Nothing is intentionally playing.
    Idle,

    /// The stand-in source carries the session.
    StubActive,

    /// A real page audio element carries the session.
    RealActive,
}

/// The reconciliation state machine.
///
/// Owns the stand-in bookkeeping and all published-state caches. Normally
/// driven by [`SessionBridge`](crate::bridge::SessionBridge); embedders with
/// their own scheduling (and tests) can construct one directly and feed it
/// events through [`step`](Reconciler::step).
pub struct Reconciler {
    page: Arc<dyn PageSurface>,
    stub_audio: Arc<dyn StubAudio>,
    surface: Arc<dyn MediaSurface>,
    config: BridgeConfig,

    stub: StubSource,
    state: SourceState,
    playing_real: HashSet<AudioId>,
    dispatcher: ControlDispatcher,

    last_content: Option<TrackMetadata>,
    refresh_parity: bool,
    published_state: Option<PlaybackState>,

    events_tx: broadcast::Sender<BridgeEvent>,
    playback: Property<Option<PlaybackState>>,
    metadata: Property<Option<SessionMetadata>>,
}

impl Reconciler {
    /// Create an engine over the three collaborator boundaries.
    pub fn new(
        page: Arc<dyn PageSurface>,
        stub_audio: Arc<dyn StubAudio>,
        surface: Arc<dyn MediaSurface>,
        config: BridgeConfig,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(256);

        Self {
            page,
            stub_audio,
            surface,
            dispatcher: ControlDispatcher::new(config.control_debounce),
            config,
            stub: StubSource::default(),
            state: SourceState::Idle,
            playing_real: HashSet::new(),
            last_content: None,
            refresh_parity: true,
            published_state: None,
            events_tx,
            playback: Property::new(None),
            metadata: Property::new(None),
        }
    }

    /// Apply one event at the given instant.
    ///
    /// This is the only mutation point. It never fails: a missing page
    /// element reads as no information, and a refused stand-in start is
    /// retried on the next qualifying tick.
    pub async fn step(&mut self, event: EngineEvent, now: Instant) {
        match event {
            EngineEvent::RealAudio { id, signal } => self.handle_real_audio(id, signal, now),
            EngineEvent::PlaybackTick => self.handle_playback_tick(now).await,
            EngineEvent::MetadataTick => self.publish_metadata(),
            EngineEvent::Control(action) => self.handle_control(action, now).await,
            EngineEvent::IndicatorLost => {
                debug!("play toggle left the page, re-deriving state");
                self.handle_playback_tick(now).await;
            }
        }
    }

    /// The source currently considered active.
    pub fn source_state(&self) -> SourceState {
        self.state
    }

    /// Last playback state published to the platform.
    pub fn playback(&self) -> Property<Option<PlaybackState>> {
        self.playback.clone()
    }

    /// Last metadata record published to the platform.
    pub fn metadata(&self) -> Property<Option<SessionMetadata>> {
        self.metadata.clone()
    }

    pub(crate) fn events_channel(&self) -> broadcast::Sender<BridgeEvent> {
        self.events_tx.clone()
    }

    fn handle_real_audio(&mut self, id: AudioId, signal: AudioSignal, now: Instant) {
        self.stub.last_external_audio_event_at = Some(now);

        match signal {
            AudioSignal::Started => {
                self.playing_real.insert(id);
            }
            AudioSignal::Paused | AudioSignal::Ended | AudioSignal::Failed => {
                self.playing_real.remove(&id);
            }
            _ => {}
        }

        if self.stub.is_playing {
            self.silence_stub();
            debug!(%id, ?signal, "real audio active, stand-in yields");
        }

        self.state = if self.playing_real.is_empty() {
            SourceState::Idle
        } else {
            SourceState::RealActive
        };
        trace!(%id, ?signal, state = ?self.state, "real audio signal");
    }

    async fn handle_playback_tick(&mut self, now: Instant) {
        match page::read_indicator(self.page.as_ref()) {
            IndicatorState::Playing => {
                let quiet = self.stub.quiescent(now, self.config.audio_quiescence);
                if self.playing_real.is_empty() && quiet {
                    let was_stub = self.state == SourceState::StubActive;
                    if self.ensure_stub_playing(now).await {
                        self.state = SourceState::StubActive;
                        if !was_stub {
                            // A fresh takeover repaints the whole surface:
                            // cached content is discarded so the record goes
                            // out again even if the track did not change.
                            self.last_content = None;
                            self.publish_metadata();
                        }
                    }
                }
                self.publish_state(PlaybackState::Playing);
            }
            IndicatorState::Paused => {
                self.silence_stub();
                self.state = SourceState::Idle;
                self.publish_state(PlaybackState::Paused);
            }
            IndicatorState::Unknown => {}
        }
    }

    async fn handle_control(&mut self, action: ControlAction, now: Instant) {
        if action.is_toggle() {
            if !self.dispatcher.allow_toggle(now) {
                debug!(?action, "toggle ignored inside debounce window");
                return;
            }

            self.page.click(PageRole::PlayToggle);
            self.stub.last_control_action_at = Some(now);
            self.stub_audio.rewind();

            if action == ControlAction::Play {
                if self.ensure_stub_playing(now).await {
                    self.state = SourceState::StubActive;
                }
                self.publish_state(PlaybackState::Playing);
            } else {
                self.silence_stub();
                self.state = SourceState::Idle;
                self.publish_state(PlaybackState::Paused);
            }
        } else {
            for role in action.skip_targets() {
                self.page.click(*role);
            }
            self.stub.last_control_action_at = Some(now);
        }

        let _ = self.events_tx.send(BridgeEvent::ControlDispatched(action));
        debug!(?action, "control action dispatched");
    }

    async fn ensure_stub_playing(&mut self, now: Instant) -> bool {
        if self.stub.is_playing {
            return true;
        }

        match self.stub_audio.play().await {
            Ok(()) => {
                self.stub.is_playing = true;
                self.stub.last_played_at = Some(now);
                debug!("stand-in source started");
                true
            }
            Err(e) => {
                debug!("stand-in start refused: {e}");
                false
            }
        }
    }

    fn silence_stub(&mut self) {
        if self.stub.is_playing {
            self.stub_audio.pause();
            self.stub.is_playing = false;
        }
    }

    fn publish_state(&mut self, state: PlaybackState) {
        if self.published_state == Some(state) {
            return;
        }

        self.surface.set_playback_state(state);
        self.published_state = Some(state);
        self.playback.set(Some(state));
        let _ = self.events_tx.send(BridgeEvent::StatePublished(state));
        debug!(?state, "published playback state");
    }

    fn publish_metadata(&mut self) {
        let track = metadata::extract(self.page.as_ref());
        if self.last_content.as_ref() != Some(&track) {
            debug!(title = %track.title, artist = %track.artist, "now-playing content changed");
        }

        let mut record = SessionMetadata::from_track(&track);
        if self.refresh_parity {
            record.mark_refresh();
        }
        self.refresh_parity = !self.refresh_parity;

        self.surface.set_metadata(&record);
        self.metadata.set(Some(record.clone()));
        let _ = self.events_tx.send(BridgeEvent::MetadataPublished(record));
        self.last_content = Some(track);
    }
}
