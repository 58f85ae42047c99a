#![doc = include_str!("../README.md")]

pub mod csrf;
pub mod error;
pub mod http;
pub mod oauth;
pub mod resource;
pub mod types;
pub(crate) mod upstream;
pub mod wire;

// Re-exports for convenient access
pub use csrf::{generate_state, states_match};
pub use error::Error;
pub use oauth::{AuthClient, AuthorizationRequest, ClientSecret, OAuthConfig, PLAYLIST_READ_SCOPE};
pub use resource::{ApiClient, summarize_playlists, summarize_tracks};
pub use types::{AccessToken, PlaylistId, PlaylistSummary, TrackSummary};
