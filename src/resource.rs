//! Resource proxy: bearer-authorized calls to the provider's Web API and the
//! pure reshaping of its responses into the client-facing schema.

use url::Url;

use crate::error::Error;
use crate::types::{AccessToken, PlaylistId, PlaylistSummary, TrackSummary};
use crate::upstream;
use crate::wire::{Paging, Playlist, PlaylistItem};

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Client for the provider's resource API.
///
/// Holds no per-user state: every call takes the caller's own token.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            http: upstream::default_http_client(),
        }
    }

    /// Override the API base (default `https://api.spotify.com/v1`).
    #[must_use]
    pub fn with_base_url(mut self, url: &Url) -> Self {
        self.base_url = url.as_str().trim_end_matches('/').to_string();
        self
    }

    /// Use a custom HTTP client (timeouts, connection pool reuse, testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// First page of the current user's playlists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure or timeout,
    /// [`Error::UpstreamStatus`] on a non-success status, or
    /// [`Error::MalformedResponse`] if the body does not decode.
    pub async fn list_playlists(&self, token: &AccessToken) -> Result<Vec<PlaylistSummary>, Error> {
        const OPERATION: &str = "playlists request";

        let url = format!("{}/me/playlists", self.base_url);
        let page: Paging<Playlist> = self.get_json(&url, token, OPERATION).await?;
        if page.next.is_some() {
            tracing::debug!(total = ?page.total, "Returning first playlist page only");
        }
        Ok(summarize_playlists(page))
    }

    /// First page of items in `playlist_id`, minus unavailable tracks.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::list_playlists`]; an unknown id surfaces as the
    /// provider's 404 in [`Error::UpstreamStatus`].
    pub async fn list_tracks(
        &self,
        token: &AccessToken,
        playlist_id: &PlaylistId,
    ) -> Result<Vec<TrackSummary>, Error> {
        const OPERATION: &str = "playlist items request";

        let url = format!(
            "{}/playlists/{}/tracks",
            self.base_url,
            urlencoding::encode(&playlist_id.0)
        );
        let page: Paging<PlaylistItem> = self.get_json(&url, token, OPERATION).await?;
        Ok(summarize_tracks(page))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        token: &AccessToken,
        operation: &'static str,
    ) -> Result<T, Error> {
        let response = self
            .http
            .get(url)
            .bearer_auth(token.expose())
            .send()
            .await?;

        let response = upstream::ensure_success(response, operation).await?;
        upstream::read_json(response, operation).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce provider playlists to `{id, name, image}`, preserving order.
#[must_use]
pub fn summarize_playlists(page: Paging<Playlist>) -> Vec<PlaylistSummary> {
    page.items
        .into_iter()
        .map(|playlist| PlaylistSummary {
            id: PlaylistId(playlist.id),
            name: playlist.name,
            image: playlist
                .images
                .and_then(|images| images.into_iter().next())
                .map(|image| image.url),
        })
        .collect()
}

/// Reduce playlist items to `{name, artists, url}`, dropping items whose track is `null`.
#[must_use]
pub fn summarize_tracks(page: Paging<PlaylistItem>) -> Vec<TrackSummary> {
    page.items
        .into_iter()
        .filter_map(|item| item.track)
        .map(|track| TrackSummary {
            name: track.name,
            artists: track
                .artists
                .iter()
                .map(|artist| artist.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            url: track.external_urls.and_then(|urls| urls.spotify),
        })
        .collect()
}
