//! Real and stand-in audio sources.
//!
//! The page's real audio elements cannot be controlled directly; they are
//! only observed, through the signal stream each [`RealAudio`] handle
//! exposes. The [`StubAudio`] stand-in is the inverse: a silent looping
//! asset the bridge fully controls, whose sole purpose is to be recognized
//! by the platform as active audio so the media control surface stays alive.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;

/// Identifier for one page-native audio-bearing element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioId(u64);

impl AudioId {
    /// Create an identifier from the embedder's element counter.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for AudioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audio#{}", self.0)
    }
}

/// Lifecycle and state signals observed on a real audio element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSignal {
    /// Playback began.
    Started,

    /// Playback was paused.
    Paused,

    /// Playback stalled waiting for data.
    Buffering,

    /// Playback reached the end of the stream.
    Ended,

    /// The playback position jumped.
    Seeked,

    /// Volume changed.
    VolumeChanged,

    /// Playback rate changed.
    RateChanged,

    /// The element reported an error.
    Failed,
}

/// An observed page-native audio element.
///
/// Handles are created by the embedder's page observer and delivered via
/// [`PageMutation::AudioAttached`](crate::page::PageMutation). The signal
/// stream ends when the element leaves the page; nothing is detached
/// explicitly, the dead element's listeners are simply inert.
pub trait RealAudio: Send + Sync {
    /// Identifier of the underlying element.
    fn id(&self) -> AudioId;

    /// Lifecycle signals, in the order the element emitted them.
    fn signals(&self) -> BoxStream<'static, AudioSignal>;
}

/// The controllable stand-in audio source.
///
/// Backed by a silent, looping, low-volume asset owned by the embedder.
#[async_trait]
pub trait StubAudio: Send + Sync {
    /// Start playback.
    ///
    /// # Errors
    /// Returns [`BridgeError::PlaybackRefused`](crate::BridgeError) when the
    /// platform's autoplay policy denies the attempt. The engine swallows
    /// the refusal and retries on the next qualifying tick.
    async fn play(&self) -> Result<()>;

    /// Pause playback.
    fn pause(&self);

    /// Rewind to the start of the asset.
    fn rewind(&self);
}

/// Engine-owned bookkeeping for the stand-in source.
///
/// Created once at start-up and never destroyed. `is_playing` is derived
/// from the engine's own play/pause calls rather than trusted from the
/// platform.
#[derive(Debug, Default)]
pub struct StubSource {
    /// Whether the engine last told the stand-in to play.
    pub is_playing: bool,

    /// When the stand-in was last told to play.
    pub last_played_at: Option<Instant>,

    /// Most recent activity observed on any real audio element.
    pub last_external_audio_event_at: Option<Instant>,

    /// Most recent transport-control request that was actually dispatched.
    pub last_control_action_at: Option<Instant>,
}

impl StubSource {
    /// Whether real audio has been quiet for at least `window`.
    ///
    /// True when no real-audio signal was ever observed. The caller passes
    /// `now` so interleavings can be replayed deterministically under test.
    pub fn quiescent(&self, now: Instant, window: Duration) -> bool {
        self.last_external_audio_event_at
            .is_none_or(|at| now.saturating_duration_since(at) >= window)
    }
}
