//! The backend seam.
//!
//! Page controllers are written against [`Backend`] rather than the HTTP
//! client, so the same controller code runs against the live service or
//! an in-memory double.

use std::future::Future;

use crate::error::ApiError;
use crate::types::{
    Ack, Episode, Favorite, Film, LoginRequest, LoginResponse, NewWatchEntry, ProfileUpdate,
    ProgressUpdate, RateResponse, RegisterRequest, RegisterResponse, RelatedFilm, Review,
    UserProfile, UserRating, ViewCount, WatchHistoryEntry,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Every call the storefront issues against its REST backend.
pub trait Backend: Send + Sync {
    // ── auth / users ─────────────────────────────────────────

    /// `POST /auth/login`
    fn login(&self, req: &LoginRequest)
        -> impl Future<Output = ApiResult<LoginResponse>> + Send;

    /// `POST /users`
    fn register(
        &self,
        req: &RegisterRequest,
    ) -> impl Future<Output = ApiResult<RegisterResponse>> + Send;

    /// `GET /auth/profile`
    fn profile(&self) -> impl Future<Output = ApiResult<UserProfile>> + Send;

    /// `GET /auth/verify-token`
    fn verify_token(&self) -> impl Future<Output = ApiResult<UserProfile>> + Send;

    /// `PUT /auth/update-profile`
    fn update_profile(&self, update: &ProfileUpdate)
        -> impl Future<Output = ApiResult<()>> + Send;

    /// `PUT /users/profile`, the account edit that invalidates the session.
    fn update_account(&self, update: &ProfileUpdate)
        -> impl Future<Output = ApiResult<Ack>> + Send;

    // ── catalog ──────────────────────────────────────────────

    /// `GET /movies`
    fn films(&self) -> impl Future<Output = ApiResult<Vec<Film>>> + Send;

    /// `GET /movies/:id`
    fn film(&self, id: &str) -> impl Future<Output = ApiResult<Film>> + Send;

    /// `GET /movies/top?limit=N`
    fn top_films(&self, limit: u32) -> impl Future<Output = ApiResult<Vec<Film>>> + Send;

    /// `GET /episodes/:id`
    fn episodes(&self, film_id: &str) -> impl Future<Output = ApiResult<Vec<Episode>>> + Send;

    /// `GET /movies/related/:id`
    fn related(&self, film_id: &str)
        -> impl Future<Output = ApiResult<Vec<RelatedFilm>>> + Send;

    /// `GET /reviews/:id`
    fn reviews(&self, film_id: &str) -> impl Future<Output = ApiResult<Vec<Review>>> + Send;

    /// `POST /movies/add-view`
    fn add_view(
        &self,
        film_id: &str,
        user_id: &str,
    ) -> impl Future<Output = ApiResult<ViewCount>> + Send;

    // ── ratings ──────────────────────────────────────────────

    /// `POST /movies/rate`
    fn rate(
        &self,
        film_id: &str,
        rating: f32,
        user_id: Option<&str>,
    ) -> impl Future<Output = ApiResult<RateResponse>> + Send;

    /// `GET /movies/ratings/user/:id`
    fn user_ratings(&self, user_id: &str)
        -> impl Future<Output = ApiResult<Vec<UserRating>>> + Send;

    // ── favorites ────────────────────────────────────────────

    /// `GET /favorites/user/:id`
    fn favorites(&self, user_id: &str) -> impl Future<Output = ApiResult<Vec<Favorite>>> + Send;

    /// `POST /favorites`
    fn add_favorite(
        &self,
        user_id: &str,
        film_id: &str,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// `DELETE /favorites/:id`
    fn remove_favorite(&self, film_id: &str) -> impl Future<Output = ApiResult<()>> + Send;

    // ── watch history ────────────────────────────────────────

    /// `POST /watch-history`
    fn record_watch(&self, entry: &NewWatchEntry) -> impl Future<Output = ApiResult<()>> + Send;

    /// `GET /watch-history/user/:id`, normalized.
    fn watch_history(
        &self,
        user_id: &str,
    ) -> impl Future<Output = ApiResult<Vec<WatchHistoryEntry>>> + Send;

    /// `PATCH /watch-history/user/:uid/movie/:mid`
    fn update_watch_progress(
        &self,
        user_id: &str,
        film_id: &str,
        update: &ProgressUpdate,
    ) -> impl Future<Output = ApiResult<()>> + Send;
}
