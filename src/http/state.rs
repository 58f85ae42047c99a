use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use super::config::RelaySettings;
use crate::oauth::AuthClient;
use crate::resource::ApiClient;

/// Shared state for relay route handlers. Immutable after startup.
#[derive(Clone)]
pub(super) struct AppState {
    pub(super) oauth: Arc<AuthClient>,
    pub(super) api: Arc<ApiClient>,
    pub(super) settings: RelaySettings,
}

// PrivateCookieJar requires Key to be extractable from state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.settings.cookie_key.clone()
    }
}
