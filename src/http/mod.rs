//! Axum HTTP surface of the relay.
//!
//! The browser never sees provider credentials: `/login` and `/callback`
//! run the authorization code flow server-side, the resulting access token
//! lives only in an `HttpOnly` cookie, and `/playlists` + `/playlist/{id}`
//! turn that cookie back into a bearer token for the provider's Web API.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use playlist_relay::http::{RelayConfig, relay_routes};
//!
//! let config = RelayConfig::from_env()?;
//! let app = relay_routes(config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! ```

mod config;
mod cookies;
mod cors;
mod error;
mod extractor;
mod routes;
mod state;

pub use config::RelayConfig;
pub use cookies::SESSION_COOKIE_NAME;
pub use cors::AllowedOrigins;
pub use error::ApiError;
pub use extractor::{SessionToken, attach_session, clear_session, extract_session};
pub use routes::relay_routes;

/// Re-export cookie key type for builder API.
pub use axum_extra::extract::cookie::Key as CookieKey;
