use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Request-level errors of the relay's HTTP surface.
///
/// `Display` may carry upstream detail for server logs; the response body
/// only ever holds the generic [`ApiError::public_message`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `/callback` without an authorization code.
    #[error("No code provided")]
    MissingCode,

    /// The provider redirected back with `?error=`.
    #[error("Authorization denied by provider: {0}")]
    AuthorizationDenied(String),

    /// Callback `state` absent or different from the one issued at login.
    #[error("OAuth state mismatch")]
    StateMismatch,

    /// No session cookie on the request.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Code-for-token exchange failed; no session was created.
    #[error("Token exchange failed: {0}")]
    TokenExchange(#[source] crate::error::Error),

    /// Resource API call failed.
    #[error("Upstream request failed: {0}")]
    Upstream(#[source] crate::error::Error),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingCode | Self::AuthorizationDenied(_) => StatusCode::BAD_REQUEST,
            Self::StateMismatch => StatusCode::FORBIDDEN,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::TokenExchange(_) => StatusCode::BAD_GATEWAY,
            Self::Upstream(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(e) => match e.upstream_status() {
                Some(401) => StatusCode::UNAUTHORIZED,
                Some(404) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Client-safe message: never contains tokens or provider bodies.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Config(_) => "Internal error",
            Self::MissingCode => "No code provided",
            Self::AuthorizationDenied(_) => "Authorization was not granted",
            Self::StateMismatch => "Invalid or expired login attempt. Please go to /login again.",
            Self::Unauthenticated => "Not logged in. Please go to /login first.",
            Self::TokenExchange(_) => "Token exchange failed",
            Self::Upstream(_) => match self.status() {
                StatusCode::UNAUTHORIZED => "Session expired. Please go to /login again.",
                StatusCode::NOT_FOUND => "Not found",
                StatusCode::GATEWAY_TIMEOUT => "Upstream request timed out",
                _ => "Upstream request failed",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

impl From<crate::error::Error> for ApiError {
    fn from(e: crate::error::Error) -> Self {
        Self::Upstream(e)
    }
}
