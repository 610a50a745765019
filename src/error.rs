use thiserror::Error;

/// Errors surfaced by the bridge and its collaborator traits.
///
/// The reconciliation path itself never fails; a missing page element or an
/// unreadable attribute degrades to "no information this tick" and is retried
/// on the next one. Errors exist only at the seams: a stand-in source whose
/// playback attempt the platform refused, or a handle used after shutdown.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The platform refused to start the stand-in audio source.
    ///
    /// Typically an autoplay policy denial. The engine swallows this and
    /// re-attempts on the next qualifying reconciliation tick.
    #[error("stand-in playback refused: {reason}")]
    PlaybackRefused {
        /// Platform-provided denial reason
        reason: String,
    },

    /// The bridge has shut down and no longer accepts control actions.
    #[error("session bridge has shut down")]
    Shutdown,
}

/// A specialized `Result` type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Creates a playback refusal from a platform error.
    pub fn refused(reason: impl std::fmt::Display) -> Self {
        BridgeError::PlaybackRefused {
            reason: reason.to_string(),
        }
    }
}
