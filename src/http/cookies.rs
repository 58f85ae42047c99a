use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie carrying the raw bearer token; it *is* the session.
pub const SESSION_COOKIE_NAME: &str = "access_token";

const STATE_COOKIE_NAME: &str = "oauth_state";

/// How long a login attempt may take between `/login` and `/callback`.
const STATE_TTL: Duration = Duration::minutes(10);

/// Create the encrypted anti-forgery state cookie for the authorization request.
///
/// `SameSite=Lax` is enough: the provider's redirect back is a top-level navigation.
pub(super) fn state_cookie(state: &str, callback_path: &str) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE_NAME, state.to_string()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path(callback_path.to_string())
        .max_age(STATE_TTL)
        .build()
}

/// Create removal cookie for the state.
pub(super) fn clear_state_cookie(callback_path: &str) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE_NAME, ""))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path(callback_path.to_string())
        .max_age(Duration::ZERO)
        .build()
}

/// Get the issued state from cookies.
pub(super) fn get_state(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(STATE_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Create the session cookie.
///
/// `SameSite=None` because the frontend calls the relay cross-site with
/// credentials. No `Max-Age`: it lives for the browser session.
pub(super) fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.to_string()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .build()
}

/// Create removal cookie for the session.
pub(super) fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("BQD-token");

        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.value(), "BQD-token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), None);
        assert!(cookie.expires().is_none());
    }

    #[test]
    fn session_cookie_header_form() {
        let header = session_cookie("BQD-token").to_string();

        assert!(header.starts_with("access_token=BQD-token"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Secure"));
        assert!(header.contains("SameSite=None"));
    }

    #[test]
    fn state_cookie_is_short_lived_and_scoped() {
        let cookie = state_cookie("abc", "/callback");

        assert_eq!(cookie.path(), Some("/callback"));
        assert_eq!(cookie.max_age(), Some(STATE_TTL));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn removal_cookies_expire_immediately() {
        assert_eq!(clear_state_cookie("/callback").max_age(), Some(Duration::ZERO));
        assert_eq!(clear_session_cookie().max_age(), Some(Duration::ZERO));
        assert_eq!(clear_session_cookie().path(), Some("/"));
    }
}
