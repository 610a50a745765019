//! Host page adapter boundary.
//!
//! Everything the bridge knows about the page's structure lives behind this
//! module: content and controls are addressed by stable logical role, and the
//! embedder resolves each role against whatever element the page currently
//! renders. The page is an uncontrolled external surface, so every read here
//! is infallible; absence is `None`, never an error.

use std::fmt;
use std::sync::Arc;

use crate::audio::{AudioId, RealAudio};

/// Toggle mode attribute value meaning the page is currently playing.
///
/// The page shows a pause affordance while audio is running.
pub const MODE_PLAYING: &str = "pause_button";

/// Toggle mode attribute value meaning the page is currently paused.
pub const MODE_PAUSED: &str = "play_button";

/// Stable logical roles resolved against the host page.
///
/// The station and playlist layouts of the page expose different control
/// elements for the same intent, which is why both a `Replay`/`Skip` pair
/// and a `SkipBack`/`SkipForward` pair exist; an embedder maps whichever
/// roles the current layout has and leaves the rest unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRole {
    /// The single play/pause toggle control.
    PlayToggle,

    /// Station-layout replay control (restart / previous).
    Replay,

    /// Playlist-layout skip-back control.
    SkipBack,

    /// Station-layout skip control (next).
    Skip,

    /// Playlist-layout skip-forward control.
    SkipForward,

    /// Now-playing track title text.
    TrackTitle,

    /// Now-playing artist text.
    TrackArtist,

    /// Now-playing album name text.
    AlbumName,

    /// Now-playing artwork image.
    TrackArt,
}

/// Structural read and interaction access to the host page.
///
/// Implemented by the embedder against the real page. All methods must be
/// cheap and non-blocking; they are called from every reconciliation tick.
pub trait PageSurface: Send + Sync {
    /// Textual content of a role's element, if the element exists.
    fn text(&self, role: PageRole) -> Option<String>;

    /// Image source URL of a role's element, if the element exists.
    fn image_source(&self, role: PageRole) -> Option<String>;

    /// Raw mode attribute of the play/pause toggle, if the toggle exists.
    fn toggle_mode(&self) -> Option<String>;

    /// Dispatch a synthesized activation at a role's element.
    ///
    /// Fire-and-forget: a missing element is a silent no-op, and success is
    /// never assumed. The page's own subsequent mutations are the only
    /// feedback.
    fn click(&self, role: PageRole);
}

/// What the page's own playback indicator currently claims.
///
/// `Unknown` carries no information: the engine must not treat it as
/// `Paused`, or transient page updates would stop the stand-in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    /// The page considers itself playing.
    Playing,

    /// The page considers itself paused.
    Paused,

    /// Missing element or unrecognized mode value.
    Unknown,
}

impl From<&str> for IndicatorState {
    fn from(mode: &str) -> Self {
        match mode {
            MODE_PLAYING => Self::Playing,
            MODE_PAUSED => Self::Paused,
            _ => Self::Unknown,
        }
    }
}

/// Read the page's playback indicator.
pub fn read_indicator(page: &dyn PageSurface) -> IndicatorState {
    match page.toggle_mode() {
        Some(mode) => IndicatorState::from(mode.as_str()),
        None => IndicatorState::Unknown,
    }
}

/// Structural change notification pushed by the embedder's page observer.
#[derive(Clone)]
pub enum PageMutation {
    /// An audio-bearing element entered the page.
    AudioAttached(Arc<dyn RealAudio>),

    /// An audio-bearing element left the page.
    AudioDetached(AudioId),

    /// A control element left the page.
    ///
    /// Removal of [`PageRole::PlayToggle`] triggers an immediate state
    /// re-derivation; other roles are ignored.
    ControlDetached(PageRole),
}

impl fmt::Debug for PageMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AudioAttached(handle) => {
                f.debug_tuple("AudioAttached").field(&handle.id()).finish()
            }
            Self::AudioDetached(id) => f.debug_tuple("AudioDetached").field(id).finish(),
            Self::ControlDetached(role) => f.debug_tuple("ControlDetached").field(role).finish(),
        }
    }
}
