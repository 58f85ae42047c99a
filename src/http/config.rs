use std::time::Duration;

use axum_extra::extract::cookie::Key;
use url::Url;

use super::cors::AllowedOrigins;
use super::error::ApiError;
use crate::oauth::{AuthClient, ClientSecret, OAuthConfig};
use crate::resource::ApiClient;
use crate::upstream;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// Relay settings shared by config and runtime state.
#[derive(Clone)]
pub(crate) struct RelaySettings {
    pub(crate) cookie_key: Key,
    pub(crate) frontend_url: Url,
    pub(crate) allowed_origins: AllowedOrigins,
    pub(crate) callback_path: String,
}

/// Relay configuration, read once at startup and immutable afterwards.
///
/// Required pieces (`client`, `api`, `frontend_url`) are constructor parameters.
///
/// Use [`from_env()`](RelayConfig::from_env) for convention-based setup,
/// or [`new()`](RelayConfig::new) with `with_*` methods for full control.
pub struct RelayConfig {
    pub(super) client: AuthClient,
    pub(super) api: ApiClient,
    pub(super) settings: RelaySettings,
}

impl RelayConfig {
    /// Create config from the required clients and frontend URL.
    ///
    /// The state cookie is scoped to the redirect URI's path; the cookie key
    /// is ephemeral and origins default to the local dev server.
    #[must_use]
    pub fn new(client: AuthClient, api: ApiClient, frontend_url: Url) -> Self {
        let callback_path = client.config().redirect_path();
        Self {
            client,
            api,
            settings: RelaySettings {
                cookie_key: Key::generate(),
                frontend_url,
                allowed_origins: AllowedOrigins::from_list(DEFAULT_ALLOWED_ORIGINS),
                callback_path,
            },
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `SPOTIFY_CLIENT_ID`: OAuth2 client ID
    /// - `SPOTIFY_CLIENT_SECRET`: OAuth2 client secret
    /// - `SPOTIFY_REDIRECT_URI`: registered callback URI (must be a valid URL)
    /// - `FRONTEND_URL`: where the browser lands after login/logout
    ///
    /// # Optional env vars
    /// - `ALLOWED_ORIGINS`: comma-separated CORS origins
    /// - `ALLOWED_ORIGIN_REGEX`: origins matching this pattern in full are also allowed
    /// - `SPOTIFY_ACCOUNTS_URL`: override the accounts service base
    /// - `SPOTIFY_API_URL`: override the Web API base
    /// - `UPSTREAM_TIMEOUT_SECS`: per-call timeout for provider requests (default 10)
    /// - `COOKIE_KEY`: state cookie encryption key bytes
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if required env vars are missing or values are invalid.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env()`](RelayConfig::from_env) with an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if required variables are missing or values are invalid.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required =
            |name: &str| var(name).ok_or_else(|| ApiError::Config(format!("{name} is required")));

        let client_id = required("SPOTIFY_CLIENT_ID")?;
        let client_secret = ClientSecret::new(required("SPOTIFY_CLIENT_SECRET")?);
        let redirect_uri = required("SPOTIFY_REDIRECT_URI")?;
        parse_url("SPOTIFY_REDIRECT_URI", &redirect_uri)?;
        let frontend_url = parse_url("FRONTEND_URL", &required("FRONTEND_URL")?)?;

        let timeout = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ApiError::Config(format!(
                        "UPSTREAM_TIMEOUT_SECS: expected a positive integer, got '{raw}'"
                    )));
                }
            },
            None => upstream::DEFAULT_UPSTREAM_TIMEOUT,
        };
        let http = upstream::build_http_client(timeout).map_err(|e| ApiError::Config(e.to_string()))?;

        let mut oauth = OAuthConfig::new(client_id, client_secret, redirect_uri);
        if let Some(raw) = var("SPOTIFY_ACCOUNTS_URL") {
            let url = parse_url("SPOTIFY_ACCOUNTS_URL", &raw)?;
            oauth = oauth
                .with_accounts_url(&url)
                .map_err(|e| ApiError::Config(e.to_string()))?;
        }

        let mut api = ApiClient::new().with_http_client(http.clone());
        if let Some(raw) = var("SPOTIFY_API_URL") {
            api = api.with_base_url(&parse_url("SPOTIFY_API_URL", &raw)?);
        }

        let mut origins =
            AllowedOrigins::from_list(&var("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.into()));
        if let Some(pattern) = var("ALLOWED_ORIGIN_REGEX") {
            origins = origins
                .with_pattern(&pattern)
                .map_err(|e| ApiError::Config(format!("ALLOWED_ORIGIN_REGEX: {e}")))?;
        }

        let mut config = Self::new(AuthClient::new(oauth).with_http_client(http), api, frontend_url)
            .with_allowed_origins(origins);

        if let Some(raw) = var("COOKIE_KEY") {
            let key = Key::try_from(raw.as_bytes()).map_err(|_| {
                ApiError::Config(
                    "COOKIE_KEY is set but invalid (must be at least 64 bytes). \
                     Remove the env var to use an ephemeral key, or provide a valid key."
                        .into(),
                )
            })?;
            config = config.with_cookie_key(key);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_cookie_key(mut self, key: Key) -> Self {
        self.settings.cookie_key = key;
        self
    }

    #[must_use]
    pub fn with_frontend_url(mut self, url: Url) -> Self {
        self.settings.frontend_url = url;
        self
    }

    #[must_use]
    pub fn with_allowed_origins(mut self, origins: AllowedOrigins) -> Self {
        self.settings.allowed_origins = origins;
        self
    }

    #[must_use]
    pub fn frontend_url(&self) -> &Url {
        &self.settings.frontend_url
    }

    #[must_use]
    pub fn allowed_origins(&self) -> &AllowedOrigins {
        &self.settings.allowed_origins
    }

    #[must_use]
    pub fn oauth(&self) -> &OAuthConfig {
        self.client.config()
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        self.api.base_url()
    }
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ApiError> {
    raw.parse()
        .map_err(|e| ApiError::Config(format!("{name}: {e}")))
}
