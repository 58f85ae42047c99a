use axum::http::{HeaderValue, Method, request::Parts};
use regex::Regex;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Cross-origin allow-list: exact origins plus an optional full-match pattern.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins {
    exact: Vec<String>,
    pattern: Option<Regex>,
}

impl AllowedOrigins {
    #[must_use]
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            exact: origins
                .into_iter()
                .map(|o| o.as_ref().trim().trim_end_matches('/').to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            pattern: None,
        }
    }

    /// Parse a comma-separated origin list.
    #[must_use]
    pub fn from_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// Also admit any origin the pattern matches in full.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(&format!("^(?:{pattern})$"))?);
        Ok(self)
    }

    #[must_use]
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.exact.iter().any(|o| o == origin)
            || self.pattern.as_ref().is_some_and(|re| re.is_match(origin))
    }

    #[must_use]
    pub fn exact(&self) -> &[String] {
        &self.exact
    }
}

/// CORS layer honouring credentials for allowed origins only.
pub(super) fn cors_layer(origins: AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin.to_str().is_ok_and(|o| origins.is_allowed(o))
            },
        ))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_origins_match() {
        let origins = AllowedOrigins::from_list("http://localhost:5173, https://app.example.com/ ,");

        assert_eq!(
            origins.exact(),
            &["http://localhost:5173", "https://app.example.com"]
        );
        assert!(origins.is_allowed("http://localhost:5173"));
        assert!(origins.is_allowed("https://app.example.com"));
        assert!(!origins.is_allowed("http://localhost:3000"));
    }

    #[test]
    fn pattern_must_match_whole_origin() {
        let origins = AllowedOrigins::default()
            .with_pattern(r"https://retrive-spotify-playlist-.*\.vercel\.app")
            .unwrap();

        assert!(origins.is_allowed("https://retrive-spotify-playlist-git-main.vercel.app"));
        assert!(!origins.is_allowed("https://evil.example/https://retrive-spotify-playlist-x.vercel.app"));
        assert!(!origins.is_allowed("https://retrive-spotify-playlist-x.vercel.app.evil.example"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(AllowedOrigins::default().with_pattern("(").is_err());
    }

    #[test]
    fn empty_allow_list_admits_nothing() {
        let origins = AllowedOrigins::default();
        assert!(!origins.is_allowed("http://localhost:5173"));
    }
}
