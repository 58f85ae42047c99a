//! Provider JSON shapes, limited to the fields the relay reads.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// The provider sends `null` for some user-created playlists.
    #[serde(default)]
    pub images: Option<Vec<Image>>,
}

#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct PlaylistItem {
    /// `null` for removed or unavailable tracks.
    #[serde(default)]
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Token endpoint success body.
///
/// No `Debug`: it carries the raw access token.
#[derive(Clone, Deserialize)]
#[non_exhaustive]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}
