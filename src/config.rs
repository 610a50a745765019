use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing configuration for the reconciliation loop.
///
/// The defaults were tuned against observed platform event-coalescing jitter
/// and are long enough to stop the control surface flickering on track
/// changes while staying imperceptible to a user. They are defaults, not
/// requirements; embedders targeting a platform with different coalescing
/// behavior can override any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Settle period after construction before the first tick fires.
    ///
    /// The host page keeps rebuilding its structure right after load;
    /// reading it too early yields nothing useful.
    pub startup_delay: Duration,

    /// Interval between playback reconciliation ticks.
    pub playback_tick: Duration,

    /// Interval between metadata extraction ticks.
    pub metadata_tick: Duration,

    /// Minimum quiet time after any real-audio signal before the stand-in
    /// source may start playing.
    pub audio_quiescence: Duration,

    /// Minimum time between two dispatched play/pause toggle interactions.
    pub control_debounce: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_millis(500),
            playback_tick: Duration::from_millis(100),
            metadata_tick: Duration::from_millis(1000),
            audio_quiescence: Duration::from_millis(1000),
            control_debounce: Duration::from_millis(500),
        }
    }
}
