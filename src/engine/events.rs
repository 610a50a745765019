use crate::audio::{AudioId, AudioSignal};
use crate::engine::controls::ControlAction;
use crate::surface::{PlaybackState, SessionMetadata};

/// Messages on the engine's single ordered queue.
///
/// Every trigger source — the page observer, the two interval timers, the
/// platform's action callbacks — pushes onto one queue consumed by one step
/// function, so interleaving is explicit and replayable under test.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A signal was observed on a real audio element.
    RealAudio {
        /// Element the signal came from.
        id: AudioId,
        /// The observed signal.
        signal: AudioSignal,
    },

    /// Periodic playback reconciliation tick.
    PlaybackTick,

    /// Periodic metadata extraction tick.
    MetadataTick,

    /// A transport-control request from the platform.
    Control(ControlAction),

    /// The play/pause toggle element left the page.
    ///
    /// Re-derives state immediately instead of waiting for the next tick;
    /// some platforms coalesce events too aggressively for the tick alone
    /// to keep up during layout swaps.
    IndicatorLost,
}

/// Events emitted by the bridge as it publishes to the platform.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    /// A playback state was published.
    StatePublished(PlaybackState),

    /// A metadata record was published.
    MetadataPublished(SessionMetadata),

    /// A transport-control action resulted in a page interaction.
    ControlDispatched(ControlAction),
}
