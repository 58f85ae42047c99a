use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Provider-issued bearer credential.
///
/// Deliberately has no `Display` and a redacting `Debug`: the only way to
/// read the raw value is [`AccessToken::expose`], used when attaching it to
/// an outbound `Authorization` header or the session cookie.
#[derive(Clone, PartialEq, Eq, From)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw bearer value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

/// Opaque upstream playlist identifier, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct PlaylistId(pub String);

/// Client-facing reduction of a provider playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: PlaylistId,
    pub name: String,
    /// First image URL, `null` when the playlist has no artwork.
    pub image: Option<String>,
}

/// Client-facing reduction of a provider playlist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub name: String,
    /// Artist names joined with `", "`, in provider order.
    pub artists: String,
    /// Link to the track on the provider's web player, if any.
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("BQD-very-secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("BQD"));
        assert_eq!(debug, "AccessToken([redacted])");
        assert_eq!(token.expose(), "BQD-very-secret");
    }

    #[test]
    fn playlist_id_is_transparent() {
        let id = PlaylistId::from("37i9dQZF1DXcBWIGoYBM5M".to_string());
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"37i9dQZF1DXcBWIGoYBM5M\""
        );
        assert_eq!(id.to_string(), "37i9dQZF1DXcBWIGoYBM5M");
    }

    #[test]
    fn missing_image_serializes_as_null() {
        let summary = PlaylistSummary {
            id: PlaylistId("p1".into()),
            name: "Road trip".into(),
            image: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "p1", "name": "Road trip", "image": null})
        );
    }
}
