use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode, header::LOCATION};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::{CookieJar, PrivateCookieJar};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use super::config::RelayConfig;
use super::cookies;
use super::cors;
use super::error::ApiError;
use super::extractor::{SessionToken, attach_session, clear_session};
use super::state::AppState;
use crate::csrf;
use crate::types::{PlaylistId, PlaylistSummary, TrackSummary};

/// Create the relay router.
///
/// | Route | Method | |
/// |---|---|---|
/// | `/login` | GET | 302 to the provider's authorize URL |
/// | `/callback` | GET | code exchange, session cookie, 302 to the frontend |
/// | `/logout` | GET, POST | drop the session cookie, redirect to the frontend |
/// | `/playlists` | GET | current user's playlists |
/// | `/playlist/{id}` | GET | tracks of one playlist |
/// | `/health` | GET | liveness |
pub fn relay_routes(config: RelayConfig) -> Router {
    let cors = cors::cors_layer(config.settings.allowed_origins.clone());

    let state = AppState {
        oauth: Arc::new(config.client),
        api: Arc::new(config.api),
        settings: config.settings,
    };

    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/logout", get(logout).post(logout))
        .route("/playlists", get(playlists))
        .route("/playlist/{id}", get(playlist_tracks))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

/// Request span with the path only; `/callback` query strings carry the code and state.
fn request_span(request: &Request<Body>) -> tracing::Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// `302 Found` with a `Location` header.
struct Found(String);

impl IntoResponse for Found {
    fn into_response(self) -> Response {
        (StatusCode::FOUND, [(LOCATION, self.0)]).into_response()
    }
}

// ── Login ──────────────────────────────────────────────────────────

async fn login(State(state): State<AppState>, jar: PrivateCookieJar) -> (PrivateCookieJar, Found) {
    let auth_req = state.oauth.authorization_url();

    let state_cookie = cookies::state_cookie(&auth_req.state, &state.settings.callback_path);

    tracing::debug!("Redirecting to provider authorization");

    (jar.add(state_cookie), Found(auth_req.url))
}

// ── Callback ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

async fn callback(
    State(state): State<AppState>,
    private_jar: PrivateCookieJar,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(PrivateCookieJar, CookieJar, Found), ApiError> {
    if let Some(error) = params.error {
        return Err(ApiError::AuthorizationDenied(error));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(ApiError::MissingCode)?;

    let received_state = params.state.ok_or(ApiError::StateMismatch)?;
    let issued_state = cookies::get_state(&private_jar).ok_or(ApiError::StateMismatch)?;
    if !csrf::states_match(&issued_state, &received_state) {
        return Err(ApiError::StateMismatch);
    }

    // The session cookie is only minted after a complete, successful exchange.
    let token = state
        .oauth
        .exchange_code(&code)
        .await
        .map_err(ApiError::TokenExchange)?;

    let private_jar = private_jar.add(cookies::clear_state_cookie(&state.settings.callback_path));
    let jar = attach_session(jar, &token);

    tracing::info!("OAuth2 login successful");

    Ok((private_jar, jar, Found(state.settings.frontend_url.to_string())))
}

// ── Logout ─────────────────────────────────────────────────────────

async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    (clear_session(jar), Redirect::to(state.settings.frontend_url.as_str()))
}

// ── Resources ──────────────────────────────────────────────────────

async fn playlists(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<Vec<PlaylistSummary>>, ApiError> {
    let playlists = state.api.list_playlists(&token).await?;
    tracing::debug!(count = playlists.len(), "Listed playlists");
    Ok(Json(playlists))
}

async fn playlist_tracks(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path(id): Path<String>,
) -> Result<Json<Vec<TrackSummary>>, ApiError> {
    let playlist_id = PlaylistId(id);
    let tracks = state.api.list_tracks(&token, &playlist_id).await?;
    tracing::debug!(playlist_id = %playlist_id, count = tracks.len(), "Listed playlist tracks");
    Ok(Json(tracks))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn request_span_records_path_without_query() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let request = Request::get("/callback?code=secret-code&state=secret-state")
                .body(Body::empty())
                .unwrap();
            let span = request_span(&request);
            let _entered = span.enter();
            tracing::debug!("handled");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("path=/callback"));
        assert!(!output.contains("secret-code"));
        assert!(!output.contains("secret-state"));
    }
}
