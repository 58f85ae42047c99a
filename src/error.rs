#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The provider answered with a non-success status.
    #[error("{operation} returned HTTP {status}")]
    UpstreamStatus {
        operation: &'static str,
        status: u16,
        /// Provider body, kept for server-side logs only.
        detail: String,
    },
    #[error("{operation} returned a malformed body: {detail}")]
    MalformedResponse {
        operation: &'static str,
        detail: String,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Provider status code, when the provider answered at all.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamStatus { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}
