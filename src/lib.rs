//! Understudy - media control surface reconciliation for opaque web players.
//!
//! Some host pages embed an audio player that exposes no control API: the
//! real stream can neither be driven nor queried, yet the operating system's
//! media control surface (on-screen display, hardware media keys) should
//! still show accurate now-playing state. Understudy solves this with a
//! stand-in: a silent, looping audio source the platform *can* see, kept in
//! lockstep with the page's true state by observing the page's own playback
//! indicator and the audio elements it creates and destroys.
//!
//! The crate is platform-agnostic. An embedder supplies three boundaries —
//! structural access to the page ([`PageSurface`]), the silent stand-in
//! asset ([`StubAudio`]), and the native media session ([`MediaSurface`]) —
//! and feeds structural change notifications into the bridge, which runs
//! the reconciliation loop and translates the platform's transport actions
//! back into page interactions.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tokio::sync::mpsc;
//! use understudy::{BridgeConfig, SessionBridge};
//! # use understudy::{MediaSurface, PageRole, PageSurface, PlaybackState,
//! #                  SessionMetadata, StubAudio};
//! # struct Page;
//! # impl PageSurface for Page {
//! #     fn text(&self, _: PageRole) -> Option<String> { None }
//! #     fn image_source(&self, _: PageRole) -> Option<String> { None }
//! #     fn toggle_mode(&self) -> Option<String> { None }
//! #     fn click(&self, _: PageRole) {}
//! # }
//! # struct Stub;
//! # #[async_trait::async_trait]
//! # impl StubAudio for Stub {
//! #     async fn play(&self) -> understudy::Result<()> { Ok(()) }
//! #     fn pause(&self) {}
//! #     fn rewind(&self) {}
//! # }
//! # struct Surface;
//! # impl MediaSurface for Surface {
//! #     fn set_playback_state(&self, _: PlaybackState) {}
//! #     fn set_metadata(&self, _: &SessionMetadata) {}
//! # }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (mutations_tx, mutations_rx) = mpsc::unbounded_channel();
//!
//! let bridge = SessionBridge::new(
//!     std::sync::Arc::new(Page),
//!     std::sync::Arc::new(Stub),
//!     std::sync::Arc::new(Surface),
//!     mutations_rx,
//!     BridgeConfig::default(),
//! );
//!
//! // Wire the platform's action callbacks to the control handle.
//! let controls = bridge.controls();
//! controls.play();
//! # drop(mutations_tx);
//! # }
//! ```

/// Real and stand-in audio source boundaries.
pub mod audio;

/// Runtime wiring: the session bridge and its control handle.
pub mod bridge;

/// Timing configuration with tuned defaults.
pub mod config;

/// The playback-state reconciliation engine.
pub mod engine;

/// Error types and result alias.
pub mod error;

/// Track metadata extraction.
pub mod metadata;

/// Host page adapter boundary.
pub mod page;

/// Watchable published-state mirrors.
pub mod reactive;

/// Audio registry and page observer plumbing.
mod registry;

/// Platform media session boundary.
pub mod surface;

pub use audio::{AudioId, AudioSignal, RealAudio, StubAudio};
pub use bridge::{ControlHandle, SessionBridge};
pub use config::BridgeConfig;
pub use engine::{BridgeEvent, ControlAction, EngineEvent, Reconciler, SourceState};
pub use error::{BridgeError, Result};
pub use metadata::TrackMetadata;
pub use page::{IndicatorState, PageMutation, PageRole, PageSurface};
pub use reactive::Property;
pub use surface::{Artwork, MediaSurface, PlaybackState, SessionMetadata};
