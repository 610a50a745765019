//! Track metadata extraction.

use crate::page::{PageRole, PageSurface};

/// Low-resolution artwork dimension tokens and their high-resolution
/// replacements. The page serves thumbnail URLs by default; the same asset
/// exists at display resolution under a rewritten URL.
const ART_UPSCALES: [(&str, &str); 2] = [("90W", "500W"), ("90H", "500H")];

/// Now-playing content read from the page.
///
/// Every field is an empty string when its element is absent; extraction
/// never fails. Rebuilt from scratch on each extraction and compared whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    /// Track title.
    pub title: String,

    /// Track artist(s).
    pub artist: String,

    /// Album name.
    pub album: String,

    /// Artwork URL, upscaled when the thumbnail pattern was detected.
    pub artwork_url: String,
}

/// Read the current track content from the page.
///
/// Pure structural read with no side effects; callable at any frequency.
pub fn extract(page: &dyn PageSurface) -> TrackMetadata {
    TrackMetadata {
        title: page.text(PageRole::TrackTitle).unwrap_or_default(),
        artist: page.text(PageRole::TrackArtist).unwrap_or_default(),
        album: page.text(PageRole::AlbumName).unwrap_or_default(),
        artwork_url: page
            .image_source(PageRole::TrackArt)
            .map(upscale_artwork)
            .unwrap_or_default(),
    }
}

/// Rewrite a thumbnail artwork URL to request the display-resolution asset.
fn upscale_artwork(url: String) -> String {
    ART_UPSCALES
        .iter()
        .fold(url, |url, (low, high)| url.replace(low, high))
}
