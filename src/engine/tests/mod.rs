#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::audio::{AudioId, AudioSignal, StubAudio};
use crate::config::BridgeConfig;
use crate::engine::{ControlAction, EngineEvent, Reconciler, SourceState};
use crate::error::{BridgeError, Result};
use crate::page::{MODE_PAUSED, MODE_PLAYING, PageRole, PageSurface};
use crate::surface::{MediaSurface, PlaybackState, SessionMetadata};

#[derive(Default)]
struct ScriptedPage {
    texts: Mutex<HashMap<PageRole, String>>,
    art: Mutex<Option<String>>,
    mode: Mutex<Option<String>>,
    clicks: Mutex<Vec<PageRole>>,
}

impl ScriptedPage {
    fn set_mode(&self, mode: &str) {
        *self.mode.lock().unwrap() = Some(mode.to_string());
    }

    fn set_title(&self, title: &str) {
        self.texts
            .lock()
            .unwrap()
            .insert(PageRole::TrackTitle, title.to_string());
    }

    fn clicks(&self) -> Vec<PageRole> {
        self.clicks.lock().unwrap().clone()
    }
}

impl PageSurface for ScriptedPage {
    fn text(&self, role: PageRole) -> Option<String> {
        self.texts.lock().unwrap().get(&role).cloned()
    }

    fn image_source(&self, _role: PageRole) -> Option<String> {
        self.art.lock().unwrap().clone()
    }

    fn toggle_mode(&self) -> Option<String> {
        self.mode.lock().unwrap().clone()
    }

    fn click(&self, role: PageRole) {
        self.clicks.lock().unwrap().push(role);
    }
}

#[derive(Default)]
struct ScriptedStub {
    playing: AtomicBool,
    refuse: AtomicBool,
    play_calls: AtomicUsize,
    pause_calls: AtomicUsize,
    rewind_calls: AtomicUsize,
}

impl ScriptedStub {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn play_calls(&self) -> usize {
        self.play_calls.load(Ordering::SeqCst)
    }

    fn pause_calls(&self) -> usize {
        self.pause_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StubAudio for ScriptedStub {
    async fn play(&self) -> Result<()> {
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        if self.refuse.load(Ordering::SeqCst) {
            return Err(BridgeError::refused("autoplay policy"));
        }
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        self.playing.store(false, Ordering::SeqCst);
    }

    fn rewind(&self) {
        self.rewind_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct RecordingSurface {
    states: Mutex<Vec<PlaybackState>>,
    records: Mutex<Vec<SessionMetadata>>,
}

impl RecordingSurface {
    fn states(&self) -> Vec<PlaybackState> {
        self.states.lock().unwrap().clone()
    }

    fn titles(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|record| record.title.clone())
            .collect()
    }
}

impl MediaSurface for RecordingSurface {
    fn set_playback_state(&self, state: PlaybackState) {
        self.states.lock().unwrap().push(state);
    }

    fn set_metadata(&self, metadata: &SessionMetadata) {
        self.records.lock().unwrap().push(metadata.clone());
    }
}

type Harness = (
    Reconciler,
    Arc<ScriptedPage>,
    Arc<ScriptedStub>,
    Arc<RecordingSurface>,
);

fn engine() -> Harness {
    let page = Arc::new(ScriptedPage::default());
    let stub = Arc::new(ScriptedStub::default());
    let surface = Arc::new(RecordingSurface::default());
    let reconciler = Reconciler::new(
        page.clone(),
        stub.clone(),
        surface.clone(),
        BridgeConfig::default(),
    );
    (reconciler, page, stub, surface)
}

fn real_audio(id: u64, signal: AudioSignal) -> EngineEvent {
    EngineEvent::RealAudio {
        id: AudioId::new(id),
        signal,
    }
}

mod indicator_mapping {
    use super::*;

    #[tokio::test]
    async fn pause_affordance_publishes_playing() {
        let (mut engine, page, stub, surface) = engine();
        page.set_mode(MODE_PLAYING);

        engine.step(EngineEvent::PlaybackTick, Instant::now()).await;

        assert_eq!(surface.states(), vec![PlaybackState::Playing]);
        assert!(stub.is_playing());
        assert_eq!(engine.playback().get(), Some(PlaybackState::Playing));
    }

    #[tokio::test]
    async fn play_affordance_publishes_paused() {
        let (mut engine, page, stub, surface) = engine();
        page.set_mode(MODE_PAUSED);

        engine.step(EngineEvent::PlaybackTick, Instant::now()).await;

        assert_eq!(surface.states(), vec![PlaybackState::Paused]);
        assert_eq!(stub.play_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_mode_keeps_previous_state() {
        let (mut engine, page, stub, surface) = engine();
        let base = Instant::now();

        page.set_mode(MODE_PLAYING);
        engine.step(EngineEvent::PlaybackTick, base).await;

        page.set_mode("spinner_button");
        engine
            .step(EngineEvent::PlaybackTick, base + Duration::from_millis(100))
            .await;

        assert_eq!(surface.states(), vec![PlaybackState::Playing]);
        assert!(stub.is_playing());
        assert_eq!(stub.pause_calls(), 0);
    }

    #[tokio::test]
    async fn repeated_reads_publish_once() {
        let (mut engine, page, _stub, surface) = engine();
        let base = Instant::now();
        page.set_mode(MODE_PLAYING);

        for offset in 0..5 {
            engine
                .step(
                    EngineEvent::PlaybackTick,
                    base + Duration::from_millis(offset * 100),
                )
                .await;
        }

        assert_eq!(surface.states(), vec![PlaybackState::Playing]);
    }
}

mod single_active_source {
    use super::*;

    #[tokio::test]
    async fn real_signal_pauses_the_stand_in() {
        let (mut engine, page, stub, _surface) = engine();
        let base = Instant::now();

        page.set_mode(MODE_PLAYING);
        engine.step(EngineEvent::PlaybackTick, base).await;
        assert!(stub.is_playing());

        engine
            .step(
                real_audio(1, AudioSignal::Started),
                base + Duration::from_millis(50),
            )
            .await;

        assert!(!stub.is_playing());
        assert_eq!(stub.pause_calls(), 1);
        assert_eq!(engine.source_state(), SourceState::RealActive);
    }

    #[tokio::test]
    async fn stand_in_waits_out_the_quiescence_window() {
        let (mut engine, page, stub, _surface) = engine();
        let base = Instant::now();
        page.set_mode(MODE_PLAYING);

        engine.step(real_audio(1, AudioSignal::Started), base).await;
        engine.step(real_audio(1, AudioSignal::Paused), base).await;

        engine
            .step(EngineEvent::PlaybackTick, base + Duration::from_millis(500))
            .await;
        assert_eq!(stub.play_calls(), 0);

        engine
            .step(EngineEvent::PlaybackTick, base + Duration::from_millis(999))
            .await;
        assert_eq!(stub.play_calls(), 0);

        engine
            .step(
                EngineEvent::PlaybackTick,
                base + Duration::from_millis(1000),
            )
            .await;
        assert_eq!(stub.play_calls(), 1);
        assert!(stub.is_playing());
    }

    #[tokio::test]
    async fn stand_in_never_starts_while_real_audio_plays() {
        let (mut engine, page, stub, _surface) = engine();
        let base = Instant::now();
        page.set_mode(MODE_PLAYING);

        engine.step(real_audio(1, AudioSignal::Started), base).await;

        engine
            .step(EngineEvent::PlaybackTick, base + Duration::from_secs(5))
            .await;

        assert_eq!(stub.play_calls(), 0);
        assert_eq!(engine.source_state(), SourceState::RealActive);
    }

    #[tokio::test]
    async fn ended_signal_releases_the_real_source() {
        let (mut engine, _page, _stub, _surface) = engine();
        let base = Instant::now();

        engine.step(real_audio(1, AudioSignal::Started), base).await;
        engine
            .step(
                real_audio(1, AudioSignal::Ended),
                base + Duration::from_millis(10),
            )
            .await;

        assert_eq!(engine.source_state(), SourceState::Idle);
    }
}

mod stand_in_activation {
    use super::*;

    #[tokio::test]
    async fn fresh_takeover_forces_metadata_republish() {
        let (mut engine, page, _stub, surface) = engine();
        let base = Instant::now();
        page.set_mode(MODE_PLAYING);
        page.set_title("Song B");

        engine.step(EngineEvent::PlaybackTick, base).await;
        assert_eq!(surface.titles(), vec!["Song B "]);

        engine
            .step(EngineEvent::PlaybackTick, base + Duration::from_millis(100))
            .await;
        assert_eq!(surface.titles(), vec!["Song B "]);
    }

    #[tokio::test]
    async fn refused_start_is_retried_on_the_next_tick() {
        let (mut engine, page, stub, surface) = engine();
        let base = Instant::now();
        page.set_mode(MODE_PLAYING);
        stub.refuse.store(true, Ordering::SeqCst);

        engine.step(EngineEvent::PlaybackTick, base).await;
        assert_eq!(stub.play_calls(), 1);
        assert!(!stub.is_playing());
        assert_eq!(engine.source_state(), SourceState::Idle);
        assert!(surface.titles().is_empty());

        stub.refuse.store(false, Ordering::SeqCst);
        engine
            .step(EngineEvent::PlaybackTick, base + Duration::from_millis(100))
            .await;
        assert!(stub.is_playing());
        assert_eq!(engine.source_state(), SourceState::StubActive);
        assert_eq!(surface.titles().len(), 1);
    }
}

mod metadata_cadence {
    use super::*;

    #[tokio::test]
    async fn published_titles_alternate_on_unchanged_content() {
        let (mut engine, page, _stub, surface) = engine();
        page.set_title("Song A");

        for _ in 0..4 {
            engine.step(EngineEvent::MetadataTick, Instant::now()).await;
        }

        let titles = surface.titles();
        assert_eq!(titles, vec!["Song A ", "Song A", "Song A ", "Song A"]);
        for pair in titles.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[tokio::test]
    async fn content_change_is_published() {
        let (mut engine, page, _stub, surface) = engine();
        page.set_title("Song A");
        engine.step(EngineEvent::MetadataTick, Instant::now()).await;

        page.set_title("Song B");
        engine.step(EngineEvent::MetadataTick, Instant::now()).await;

        assert_eq!(surface.titles(), vec!["Song A ", "Song B"]);
    }

    #[tokio::test]
    async fn missing_page_content_publishes_empty_fields() {
        let (mut engine, _page, _stub, surface) = engine();

        engine.step(EngineEvent::MetadataTick, Instant::now()).await;

        let records = surface.records.lock().unwrap().clone();
        assert_eq!(records[0].title, " ");
        assert_eq!(records[0].artist, "");
        assert!(records[0].artwork.is_none());
    }
}

mod control_dispatch {
    use super::*;

    #[tokio::test]
    async fn toggle_actions_are_debounced() {
        let (mut engine, page, _stub, _surface) = engine();
        let base = Instant::now();

        engine
            .step(EngineEvent::Control(ControlAction::Play), base)
            .await;
        engine
            .step(
                EngineEvent::Control(ControlAction::Pause),
                base + Duration::from_millis(100),
            )
            .await;

        assert_eq!(page.clicks(), vec![PageRole::PlayToggle]);

        engine
            .step(
                EngineEvent::Control(ControlAction::Pause),
                base + Duration::from_millis(600),
            )
            .await;
        assert_eq!(
            page.clicks(),
            vec![PageRole::PlayToggle, PageRole::PlayToggle]
        );
    }

    #[tokio::test]
    async fn play_action_drives_the_stand_in() {
        let (mut engine, page, stub, surface) = engine();

        engine
            .step(EngineEvent::Control(ControlAction::Play), Instant::now())
            .await;

        assert_eq!(page.clicks(), vec![PageRole::PlayToggle]);
        assert_eq!(stub.rewind_calls.load(Ordering::SeqCst), 1);
        assert!(stub.is_playing());
        assert_eq!(surface.states(), vec![PlaybackState::Playing]);
    }

    #[tokio::test]
    async fn pause_action_silences_the_stand_in() {
        let (mut engine, _page, stub, surface) = engine();
        let base = Instant::now();

        engine
            .step(EngineEvent::Control(ControlAction::Play), base)
            .await;
        engine
            .step(
                EngineEvent::Control(ControlAction::Pause),
                base + Duration::from_millis(600),
            )
            .await;

        assert!(!stub.is_playing());
        assert_eq!(
            surface.states(),
            vec![PlaybackState::Playing, PlaybackState::Paused]
        );
    }

    #[tokio::test]
    async fn skip_actions_click_both_layout_controls() {
        let (mut engine, page, _stub, _surface) = engine();
        let base = Instant::now();

        engine
            .step(EngineEvent::Control(ControlAction::Previous), base)
            .await;
        engine
            .step(
                EngineEvent::Control(ControlAction::Next),
                base + Duration::from_millis(10),
            )
            .await;
        engine
            .step(
                EngineEvent::Control(ControlAction::Next),
                base + Duration::from_millis(20),
            )
            .await;

        assert_eq!(
            page.clicks(),
            vec![
                PageRole::Replay,
                PageRole::SkipBack,
                PageRole::Skip,
                PageRole::SkipForward,
                PageRole::Skip,
                PageRole::SkipForward,
            ]
        );
    }
}

mod fallback {
    use super::*;

    #[tokio::test]
    async fn indicator_loss_rederives_immediately() {
        let (mut engine, page, stub, surface) = engine();
        page.set_mode(MODE_PLAYING);

        engine.step(EngineEvent::IndicatorLost, Instant::now()).await;

        assert!(stub.is_playing());
        assert_eq!(surface.states(), vec![PlaybackState::Playing]);
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn station_swap_scenario() {
        let (mut engine, page, stub, surface) = engine();
        let base = Instant::now();

        page.set_mode(MODE_PAUSED);
        page.set_title("Song A");
        engine.step(EngineEvent::MetadataTick, base).await;
        engine.step(EngineEvent::PlaybackTick, base).await;

        assert_eq!(surface.titles(), vec!["Song A "]);
        assert_eq!(surface.states(), vec![PlaybackState::Paused]);

        engine
            .step(
                real_audio(1, AudioSignal::Seeked),
                base + Duration::from_millis(100),
            )
            .await;
        page.set_mode(MODE_PLAYING);
        page.set_title("Song B");

        engine
            .step(EngineEvent::PlaybackTick, base + Duration::from_millis(300))
            .await;
        assert!(!stub.is_playing());

        engine
            .step(
                EngineEvent::PlaybackTick,
                base + Duration::from_millis(1200),
            )
            .await;

        assert!(stub.is_playing());
        assert_eq!(engine.source_state(), SourceState::StubActive);
        assert_eq!(surface.titles(), vec!["Song A ", "Song B"]);
        assert_eq!(
            surface.states(),
            vec![PlaybackState::Paused, PlaybackState::Playing]
        );
    }
}
