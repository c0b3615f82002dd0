use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Extension, Json, Router};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::gate::{require_token, Claims};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/authenticate/test-security", get(test_security))
        .route("/api/movies/rate", post(rate_movie))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}

// ---------------------------------------------------------------------------
// Auth check
// ---------------------------------------------------------------------------

async fn test_security(Extension(claims): Extension<Claims>) -> Json<Value> {
    Json(json!({
        "status": true,
        "message": "login success",
        "userData": claims,
    }))
}

// ---------------------------------------------------------------------------
// Rating proxy
// ---------------------------------------------------------------------------

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A rating given as a number or a numeric string.
fn rating_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// `(movieId, rating)` when both are present and the rating is in 1..=5.
fn validate_rating(body: &Value) -> Option<(Value, f64)> {
    let movie_id = body.get("movieId").filter(|v| truthy(v))?;
    let rating = body.get("rating").and_then(rating_value)?;
    (1.0..=5.0)
        .contains(&rating)
        .then(|| (movie_id.clone(), rating))
}

async fn rate_movie(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, AppError> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("Error rating movie: malformed body: {e}");
        AppError::RateFailed
    })?;
    let (movie_id, rating) = validate_rating(&body).ok_or(AppError::InvalidRating)?;

    let url = format!("{}/movies/rate", state.backend_url);
    tracing::debug!(%url, %movie_id, rating, "Forwarding rating");

    let response = state
        .http
        .post(&url)
        .json(&json!({ "movieId": movie_id, "rating": rating }))
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Error rating movie: {e}");
            AppError::RateFailed
        })?;

    let status = response.status();
    let data: Value = response.json().await.map_err(|e| {
        tracing::error!("Error rating movie: unreadable response: {e}");
        AppError::RateFailed
    })?;

    if !status.is_success() {
        let message = data
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Failed to rate movie");
        tracing::error!(%status, "Error rating movie: {message}");
        return Err(AppError::RateFailed);
    }

    Ok(Json(data))
}
