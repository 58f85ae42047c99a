use url::Url;

use crate::csrf;
use crate::error::Error;
use crate::types::AccessToken;
use crate::upstream;
use crate::wire::TokenResponse;

const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Read-only access to the user's private playlists.
pub const PLAYLIST_READ_SCOPE: &str = "playlist-read-private";

/// `OAuth2` client secret. `Debug` never prints the value.
#[derive(Clone)]
pub struct ClientSecret(String);

impl ClientSecret {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ClientSecret([redacted])")
    }
}

/// Provider `OAuth2` credentials and endpoints.
///
/// Required fields are constructor parameters, so there is no runtime "missing field" error.
///
/// ```rust,ignore
/// use playlist_relay::{ClientSecret, OAuthConfig};
///
/// let config = OAuthConfig::new(
///     "my-client-id",
///     ClientSecret::new("my-secret"),
///     "https://relay.example.com/callback",
/// );
/// // Optional overrides via chaining:
/// let config = config.with_accounts_url(&"http://127.0.0.1:9000".parse()?)?;
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct OAuthConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: ClientSecret,
    pub(crate) auth_url: Url,
    pub(crate) token_url: Url,
    pub(crate) redirect_uri: String,
    pub(crate) scopes: Vec<String>,
}

impl OAuthConfig {
    /// Create a new configuration pointing at the public Spotify accounts service.
    ///
    /// `redirect_uri` is kept exactly as given; the provider compares it
    /// byte-for-byte against the registered value.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: ClientSecret,
        redirect_uri: impl Into<String>,
    ) -> Self {
        let accounts: Url = DEFAULT_ACCOUNTS_URL.parse().expect("valid default URL");
        let (auth_url, token_url) = accounts_endpoints(&accounts).expect("valid default URL");
        Self {
            client_id: client_id.into(),
            client_secret,
            redirect_uri: redirect_uri.into(),
            auth_url,
            token_url,
            scopes: vec![PLAYLIST_READ_SCOPE.into()],
        }
    }

    /// Point both `/authorize` and `/api/token` at another accounts host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the derived endpoint URLs are invalid.
    pub fn with_accounts_url(mut self, base: &Url) -> Result<Self, Error> {
        let (auth_url, token_url) = accounts_endpoints(base)
            .map_err(|e| Error::Config(format!("accounts URL {base}: {e}")))?;
        self.auth_url = auth_url;
        self.token_url = token_url;
        Ok(self)
    }

    /// Override the authorization endpoint.
    #[must_use]
    pub fn with_auth_url(mut self, url: Url) -> Self {
        self.auth_url = url;
        self
    }

    /// Override the token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: Url) -> Self {
        self.token_url = url;
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    #[must_use]
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Redirect URI, sent byte-for-byte identically on authorize and token exchange.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Path component of the redirect URI, `/` if it has none or does not parse.
    #[must_use]
    pub fn redirect_path(&self) -> String {
        Url::parse(&self.redirect_uri)
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| "/".into())
    }

    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

fn accounts_endpoints(base: &Url) -> Result<(Url, Url), url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    let auth_url = format!("{base}/authorize").parse()?;
    let token_url = format!("{base}/api/token").parse()?;
    Ok((auth_url, token_url))
}

/// `OAuth2` authorization code client for the provider's accounts service.
pub struct AuthClient {
    config: OAuthConfig,
    http: reqwest::Client,
}

/// Authorization URL plus the state value to remember until the callback.
#[derive(Debug)]
#[non_exhaustive]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

impl AuthClient {
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            http: upstream::default_http_client(),
        }
    }

    /// Use a custom HTTP client (timeouts, connection pool reuse, testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Generate an authorization URL with a fresh anti-forgery state.
    #[must_use]
    pub fn authorization_url(&self) -> AuthorizationRequest {
        let state = csrf::generate_state();
        let scope = self.config.scopes.join(" ");

        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &scope)
            .append_pair("state", &state);

        AuthorizationRequest {
            url: url.into(),
            state,
        }
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Authenticates with HTTP Basic `client_id:client_secret`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure or timeout,
    /// [`Error::UpstreamStatus`] if the token endpoint rejects the code, or
    /// [`Error::MalformedResponse`] if the body has no usable `access_token`.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, Error> {
        const OPERATION: &str = "token exchange";

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_url.clone())
            .basic_auth(&self.config.client_id, Some(self.config.client_secret.expose()))
            .form(&params)
            .send()
            .await?;

        let response = upstream::ensure_success(response, OPERATION).await?;
        let tokens: TokenResponse = upstream::read_json(response, OPERATION).await?;

        if tokens.access_token.is_empty() {
            return Err(Error::MalformedResponse {
                operation: OPERATION,
                detail: "empty access_token".into(),
            });
        }

        tracing::debug!(
            expires_in = ?tokens.expires_in,
            scope = ?tokens.scope,
            "Access token issued"
        );

        Ok(AccessToken::new(tokens.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OAuthConfig {
        OAuthConfig::new(
            "test-client",
            ClientSecret::new("test-secret"),
            "https://example.com/callback",
        )
    }

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_authorization_url_parameters() {
        let client = AuthClient::new(test_config());
        let req = client.authorization_url();
        let url: Url = req.url.parse().unwrap();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(url.path(), "/authorize");
        assert_eq!(query_value(&url, "client_id").as_deref(), Some("test-client"));
        assert_eq!(query_value(&url, "response_type").as_deref(), Some("code"));
        assert_eq!(
            query_value(&url, "redirect_uri").as_deref(),
            Some("https://example.com/callback")
        );
        assert_eq!(
            query_value(&url, "scope").as_deref(),
            Some("playlist-read-private")
        );
        assert_eq!(query_value(&url, "state"), Some(req.state.clone()));
        assert!(!req.url.contains("test-secret"));
    }

    #[test]
    fn test_authorization_url_unique_per_call() {
        let client = AuthClient::new(test_config());
        let req1 = client.authorization_url();
        let req2 = client.authorization_url();

        assert_ne!(req1.state, req2.state);
    }

    #[test]
    fn test_config_defaults() {
        let config = test_config();

        assert_eq!(config.client_id(), "test-client");
        assert_eq!(
            config.auth_url().as_str(),
            "https://accounts.spotify.com/authorize"
        );
        assert_eq!(
            config.token_url().as_str(),
            "https://accounts.spotify.com/api/token"
        );
        assert_eq!(config.scopes(), &["playlist-read-private"]);
    }

    #[test]
    fn test_accounts_url_override() {
        let config = test_config()
            .with_accounts_url(&"http://127.0.0.1:9000/".parse().unwrap())
            .unwrap();

        assert_eq!(config.auth_url().as_str(), "http://127.0.0.1:9000/authorize");
        assert_eq!(config.token_url().as_str(), "http://127.0.0.1:9000/api/token");
    }

    #[test]
    fn test_redirect_uri_sent_as_configured() {
        let raw = "http://127.0.0.1:8000";
        let config = OAuthConfig::new("test-client", ClientSecret::new("s"), raw);
        let req = AuthClient::new(config).authorization_url();
        let url: Url = req.url.parse().unwrap();

        assert_eq!(query_value(&url, "redirect_uri").as_deref(), Some(raw));
    }

    #[test]
    fn test_redirect_path() {
        assert_eq!(test_config().redirect_path(), "/callback");
        let bare = OAuthConfig::new("c", ClientSecret::new("s"), "http://127.0.0.1:8000");
        assert_eq!(bare.redirect_path(), "/");
    }

    #[test]
    fn test_secret_not_in_debug() {
        let debug = format!("{:?}", test_config());
        assert!(!debug.contains("test-secret"));
    }
}
