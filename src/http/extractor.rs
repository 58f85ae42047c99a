use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use super::cookies::{self, SESSION_COOKIE_NAME};
use super::error::ApiError;
use crate::types::AccessToken;

/// Bind `token` to the browser: adds the session cookie to the outgoing jar.
#[must_use]
pub fn attach_session(jar: CookieJar, token: &AccessToken) -> CookieJar {
    jar.add(cookies::session_cookie(token.expose()))
}

/// Read the session token from request cookies.
///
/// Absence is not an error here; callers decide how to react.
#[must_use]
pub fn extract_session(jar: &CookieJar) -> Option<AccessToken> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .map(AccessToken::new)
}

/// Drop the session cookie from the browser.
#[must_use]
pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.add(cookies::clear_session_cookie())
}

/// Access token of the calling browser's session.
///
/// Use as an Axum extractor in route handlers. Returns `401 Unauthorized`
/// if the request carries no session cookie.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected(SessionToken(token): SessionToken) -> impl IntoResponse {
///     // token.expose() goes into an upstream Authorization header
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionToken(pub AccessToken);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        extract_session(&jar)
            .map(Self)
            .ok_or(ApiError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header::COOKIE, header::SET_COOKIE};
    use axum::response::IntoResponse;

    use super::*;

    fn jar_with(cookie_header: &'static str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(cookie_header));
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn extracts_token_from_cookie() {
        let jar = jar_with("theme=dark; access_token=BQD-abc");
        let token = extract_session(&jar).unwrap();
        assert_eq!(token.expose(), "BQD-abc");
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        assert!(extract_session(&jar_with("theme=dark")).is_none());
        assert!(extract_session(&jar_with("access_token=")).is_none());
    }

    #[test]
    fn attach_emits_set_cookie() {
        let jar = attach_session(CookieJar::new(), &AccessToken::new("BQD-abc"));
        let response = jar.into_response();
        let header = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        assert!(header.starts_with("access_token=BQD-abc"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Secure"));
        assert!(header.contains("SameSite=None"));
    }

    #[tokio::test]
    async fn extractor_rejects_without_session() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/playlists")
            .body(())
            .unwrap()
            .into_parts();

        let result = SessionToken::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthenticated)));
    }

    #[tokio::test]
    async fn extractor_accepts_session() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/playlists")
            .header(COOKIE, "access_token=BQD-abc")
            .body(())
            .unwrap()
            .into_parts();

        let SessionToken(token) = SessionToken::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(token.expose(), "BQD-abc");
    }
}
