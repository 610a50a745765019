use std::time::{Duration, Instant};

use crate::page::PageRole;

/// Transport-control actions accepted from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Start playback.
    Play,

    /// Pause playback.
    Pause,

    /// Go to the previous track (or restart the current one).
    Previous,

    /// Skip to the next track.
    Next,
}

impl ControlAction {
    /// Whether this action drives the page's play/pause toggle.
    pub fn is_toggle(self) -> bool {
        matches!(self, Self::Play | Self::Pause)
    }

    /// Page controls a skip action clicks, in order.
    ///
    /// The station and playlist layouts expose different elements for the
    /// same intent, so both are clicked; whichever is absent is a no-op.
    /// Toggle actions target [`PageRole::PlayToggle`] alone.
    pub fn skip_targets(self) -> &'static [PageRole] {
        match self {
            Self::Previous => &[PageRole::Replay, PageRole::SkipBack],
            Self::Next => &[PageRole::Skip, PageRole::SkipForward],
            Self::Play | Self::Pause => &[],
        }
    }
}

/// Debounce gate for play/pause toggle interactions.
///
/// At least one target platform delivers a single hardware key press as two
/// back-to-back action callbacks; without the gate the second callback would
/// toggle playback right back. Skip actions showed no such race and pass
/// through unconditionally.
#[derive(Debug)]
pub struct ControlDispatcher {
    window: Duration,
    last_toggle_at: Option<Instant>,
}

impl ControlDispatcher {
    /// Create a gate with the given debounce window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_toggle_at: None,
        }
    }

    /// Whether a toggle interaction may be dispatched at `now`.
    ///
    /// Stamps the dispatch time when allowed, so a second call inside the
    /// window is refused.
    pub fn allow_toggle(&mut self, now: Instant) -> bool {
        let allowed = self
            .last_toggle_at
            .is_none_or(|at| now.saturating_duration_since(at) >= self.window);

        if allowed {
            self.last_toggle_at = Some(now);
        }
        allowed
    }
}
