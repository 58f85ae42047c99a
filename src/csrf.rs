use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use subtle::ConstantTimeEq;

/// Generates a cryptographically random `state` parameter for `OAuth2`.
///
/// Returns a 22-character URL-safe string (16 random bytes → base64url).
#[must_use]
pub fn generate_state() -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Compares the state echoed by the provider with the one issued at login.
///
/// Constant-time over the byte contents; empty values never match.
#[must_use]
pub fn states_match(issued: &str, received: &str) -> bool {
    if issued.is_empty() || received.is_empty() {
        return false;
    }
    issued.as_bytes().ct_eq(received.as_bytes()).into()
}
