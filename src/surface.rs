//! Outbound platform media session boundary.

use crate::metadata::TrackMetadata;

/// Declared dimensions of published artwork.
pub const ARTWORK_SIZES: &str = "500x500";

/// MIME type of published artwork.
pub const ARTWORK_MIME: &str = "image/jpeg";

/// Playback state published to the platform control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// The control surface shows playback running.
    Playing,

    /// The control surface shows playback paused.
    Paused,
}

/// One artwork descriptor: URL plus declared dimensions and MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    /// Asset URL.
    pub url: String,

    /// Declared dimensions, e.g. `"500x500"`.
    pub sizes: String,

    /// Declared MIME type.
    pub mime: String,
}

/// The metadata record published to the platform, as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMetadata {
    /// Track title, possibly carrying the refresh marker (a trailing space).
    pub title: String,

    /// Track artist(s).
    pub artist: String,

    /// Album name.
    pub album: String,

    /// Artwork descriptor, absent when the page exposes no artwork.
    pub artwork: Option<Artwork>,
}

impl SessionMetadata {
    /// Build a publishable record from extracted page content.
    pub fn from_track(track: &TrackMetadata) -> Self {
        let artwork = (!track.artwork_url.is_empty()).then(|| Artwork {
            url: track.artwork_url.clone(),
            sizes: ARTWORK_SIZES.to_string(),
            mime: ARTWORK_MIME.to_string(),
        });

        Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            artwork,
        }
    }

    /// Append the invisible refresh differentiator to the title.
    ///
    /// Some platform implementations silently drop a metadata update whose
    /// fields are string-identical to the previous one while the page is
    /// unfocused. Alternating a trailing space between publishes defeats
    /// that without visibly changing text in any rendering that trims
    /// whitespace.
    pub fn mark_refresh(&mut self) {
        self.title.push(' ');
    }
}

/// The platform's media control surface.
///
/// Implemented by the embedder against the native media session facility.
/// State and metadata are pushed whenever the engine decides they changed;
/// both calls must be cheap and non-blocking.
pub trait MediaSurface: Send + Sync {
    /// Publish the visible playback state.
    fn set_playback_state(&self, state: PlaybackState);

    /// Publish the now-playing metadata record.
    fn set_metadata(&self, metadata: &SessionMetadata);
}
