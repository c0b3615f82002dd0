use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A film (anime series or movie) as served by `/movies`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Film {
    #[serde(alias = "_id", deserialize_with = "de::reference")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub trailer: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "episodes", deserialize_with = "de::opt_u32")]
    pub episode_count: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub duration: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub year: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub views: Option<u64>,
    /// Average rating, 0-5.
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub rating_count: Option<u32>,
    #[serde(default)]
    pub studio: Option<String>,
    /// The signed-in user's own rating, when the backend includes it.
    #[serde(default)]
    pub user_rating: Option<f32>,
}

impl Film {
    /// Categories split from the comma separated `category` field.
    pub fn categories(&self) -> Vec<&str> {
        self.category
            .as_deref()
            .map(|c| c.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }
}

/// One episode of a film.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Episode {
    #[serde(alias = "_id", deserialize_with = "de::reference")]
    pub id: String,
    #[serde(default, deserialize_with = "de::u32_or_zero")]
    pub number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub duration: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub watched: bool,
}

/// A user review shown on the detail page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Review {
    #[serde(default, alias = "_id", deserialize_with = "de::string_or_empty")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub dislikes: u32,
}

/// A film suggested alongside the one being viewed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(remote = "Self")]
pub struct RelatedFilm {
    #[serde(alias = "_id", deserialize_with = "de::reference")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}

/// The authenticated user's profile document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "_id", deserialize_with = "de::string_or_empty")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "avatarUrl")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub watched_count: u32,
    #[serde(default)]
    pub favorite_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login answer. Older deployments send `access_token`, newer `token`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default, alias = "access_token")]
    pub token: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub claims: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(remote = "Self")]
pub struct RegisterResponse {
    #[serde(default, alias = "_id", deserialize_with = "de::opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Fields a user may change from the profile page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Generic `{ success, message }` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRequest {
    pub movie_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewCount {
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub views: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    pub movie_id: String,
    pub rating: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Rating acknowledgement carrying the film's updated aggregate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub rating_count: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One entry of a user's rating history.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct UserRating {
    #[serde(alias = "movie", deserialize_with = "de::reference")]
    pub movie_id: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub movie_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub user_id: String,
    pub movie_id: String,
}

/// A favorite relation, normalized from whatever shape the backend sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub movie_id: String,
    pub film: Option<Film>,
}

/// Body of `POST /watch-history` when an episode starts playing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWatchEntry {
    pub user_id: String,
    pub movie_id: String,
    pub episode_id: String,
    pub episode_number: u32,
    pub progress: u8,
    pub watched: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_name: Option<String>,
}

/// Body of the progress `PATCH` sent while an episode plays.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdate {
    pub progress: u8,
    pub watched: bool,
    pub timestamp: DateTime<Utc>,
}

/// Canonical watch-history record.
///
/// The backend has served several shapes over time; all of them are
/// folded into this one by [`crate::normalize::normalize_history`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchHistoryEntry {
    pub movie_id: String,
    pub movie_name: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub episode_id: Option<String>,
    pub episode_number: Option<u32>,
    /// Percent watched, 0-100.
    pub progress: u8,
    pub watched: bool,
    /// Playback position in seconds, when known.
    pub position_secs: Option<f64>,
    pub duration_secs: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl WatchHistoryEntry {
    /// Seconds to seek to when resuming this entry.
    pub fn resume_offset(&self) -> f64 {
        if let Some(pos) = self.position_secs.filter(|p| p.is_finite() && *p > 0.0) {
            return pos;
        }
        match self.duration_secs {
            Some(d) if d.is_finite() && d > 0.0 => d * f64::from(self.progress) / 100.0,
            _ => 0.0,
        }
    }
}

/// Decode through the derived `remote = "Self"` impl after dropping the
/// second key of each pair whenever the first is present, so documents
/// carrying both `_id` and `id` do not fail as duplicate fields.
macro_rules! deserialize_preferring {
    ($ty:ident, [$(($keep:literal, $drop:literal)),+ $(,)?]) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                de::preferring(d, &[$(($keep, $drop)),+], |v| $ty::deserialize(v))
            }
        }
    };
}

deserialize_preferring!(Film, [("_id", "id"), ("episodeCount", "episodes")]);
deserialize_preferring!(Episode, [("_id", "id")]);
deserialize_preferring!(Review, [("_id", "id")]);
deserialize_preferring!(RelatedFilm, [("_id", "id")]);
deserialize_preferring!(UserProfile, [("_id", "id"), ("profileImage", "avatarUrl")]);
deserialize_preferring!(LoginResponse, [("token", "access_token")]);
deserialize_preferring!(RegisterResponse, [("_id", "id")]);
deserialize_preferring!(UserRating, [("movieId", "movie")]);

/// Lenient field decoders for a backend whose document shapes drift.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value_to_string(v: &Value) -> Option<String> {
        match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(map) => map
                .get("_id")
                .or_else(|| map.get("id"))
                .or_else(|| map.get("$oid"))
                .and_then(value_to_string),
            _ => None,
        }
    }

    /// Buffer the document, drop shadowed keys, then hand it to `decode`.
    pub fn preferring<'de, D, T>(
        d: D,
        pairs: &[(&str, &str)],
        decode: impl FnOnce(Value) -> Result<T, serde_json::Error>,
    ) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = Value::deserialize(d)?;
        if let Value::Object(map) = &mut value {
            for (keep, drop) in pairs {
                if map.get(*keep).is_some_and(|v| !v.is_null()) {
                    map.remove(*drop);
                }
            }
        }
        decode(value).map_err(serde::de::Error::custom)
    }

    fn value_to_u64(v: &Value) -> Option<u64> {
        match v {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// An id given as a string, a number, or an embedded document.
    pub fn reference<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let v = Value::deserialize(d)?;
        value_to_string(&v).ok_or_else(|| serde::de::Error::custom("expected an id"))
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_to_string))
    }

    pub fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(opt_string(d)?.unwrap_or_default())
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_to_u64))
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(opt_u64(d)?.map(|n| n.min(u64::from(u32::MAX)) as u32))
    }

    pub fn u32_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(opt_u32(d)?.unwrap_or(0))
    }
}
