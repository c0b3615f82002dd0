//! Boundary normalization for backend documents whose shape varies.
//!
//! Watch-history records and favorites have been served in several
//! layouts (embedded movie document, bare id, legacy field names). The
//! functions here fold every known layout into one canonical type so
//! page code never inspects raw JSON.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::{Favorite, Film, WatchHistoryEntry};

/// Progress at or above this percentage counts as fully watched.
pub const WATCHED_PERCENT: u8 = 90;

/// Normalize one raw watch-history record.
///
/// Returns `None` when no movie id can be recovered from the record.
/// The entry counts as watched if any of these hold: an explicit
/// `completed` flag, an explicit `watched` flag, a positive legacy
/// `watchTime`, or progress of at least [`WATCHED_PERCENT`].
pub fn normalize_history(raw: &Value) -> Option<WatchHistoryEntry> {
    let movie = raw
        .get("movie")
        .filter(|m| m.is_object())
        .or_else(|| raw.get("movieId").filter(|m| m.is_object()));

    let movie_id = movie
        .and_then(|m| text(m, &["_id", "id"]))
        .or_else(|| text(raw, &["movieId", "movie", "filmId"]))?;

    let movie_name = movie
        .and_then(|m| text(m, &["name", "title"]))
        .or_else(|| text(raw, &["movieName", "name", "title"]));
    let image = movie
        .and_then(|m| text(m, &["image"]))
        .or_else(|| text(raw, &["image"]));
    let category = movie
        .and_then(|m| text(m, &["category"]))
        .or_else(|| text(raw, &["category"]));

    let progress = number(raw, &["progress"])
        .map(|p| p.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0);
    let watch_time = number(raw, &["watchTime"]).unwrap_or(0.0);

    let watched = flag(raw, "completed")
        || flag(raw, "watched")
        || watch_time > 0.0
        || progress >= WATCHED_PERCENT;

    let position_secs = number(raw, &["currentTime", "resumeTime", "position"])
        .or_else(|| (watch_time > 0.0).then_some(watch_time));

    let duration_secs = raw.get("duration").and_then(|d| match d {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_duration_secs(s),
        _ => None,
    });

    let timestamp = text(raw, &["timestamp", "updatedAt", "lastWatched", "createdAt"])
        .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
        .map(|t| t.with_timezone(&Utc));

    Some(WatchHistoryEntry {
        movie_id,
        movie_name,
        image,
        category,
        episode_id: text(raw, &["episodeId", "episode"]),
        episode_number: number(raw, &["episodeNumber"]).map(|n| n.max(0.0) as u32),
        progress,
        watched,
        position_secs,
        duration_secs,
        timestamp,
    })
}

/// Normalize a history listing, dropping records without a movie id.
pub fn normalize_history_list(raw: &[Value]) -> Vec<WatchHistoryEntry> {
    raw.iter().filter_map(normalize_history).collect()
}

/// Normalize one raw favorite record.
///
/// Accepts `{ movieId: "..." }`, `{ movieId: { ...film } }`,
/// `{ movie: { ...film } }`, or a bare film document.
pub fn normalize_favorite(raw: &Value) -> Option<Favorite> {
    let embedded = raw
        .get("movie")
        .filter(|m| m.is_object())
        .or_else(|| raw.get("movieId").filter(|m| m.is_object()));

    if let Some(doc) = embedded {
        let film: Option<Film> = serde_json::from_value(doc.clone()).ok();
        let movie_id = film
            .as_ref()
            .map(|f| f.id.clone())
            .or_else(|| text(doc, &["_id", "id"]))?;
        return Some(Favorite { movie_id, film });
    }

    if let Some(movie_id) = text(raw, &["movieId"]) {
        return Some(Favorite {
            movie_id,
            film: None,
        });
    }

    // A film document served directly.
    let film: Film = serde_json::from_value(raw.clone()).ok()?;
    Some(Favorite {
        movie_id: film.id.clone(),
        film: Some(film),
    })
}

pub fn normalize_favorite_list(raw: &[Value]) -> Vec<Favorite> {
    raw.iter().filter_map(normalize_favorite).collect()
}

/// Parse `"24:15"`, `"1:02:03"`, `"1455"` or `"24 min"` into seconds.
pub fn parse_duration_secs(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.contains(':') {
        return s.split(':').try_fold(0.0, |acc, part| {
            part.trim().parse::<f64>().ok().map(|v| acc * 60.0 + v)
        });
    }
    if let Ok(secs) = s.parse::<f64>() {
        return Some(secs);
    }
    let minutes: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if !minutes.is_empty() && s[minutes.len()..].trim_start().starts_with("min") {
        return minutes.parse::<f64>().ok().map(|m| m * 60.0);
    }
    None
}

fn text(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn number(v: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn flag(v: &Value, key: &str) -> bool {
    matches!(v.get(key), Some(Value::Bool(true)))
}
