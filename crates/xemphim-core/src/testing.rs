//! Scripted in-memory backend for controller tests.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::Value;
use xemphim_api::normalize::{normalize_favorite_list, normalize_history_list};
use xemphim_api::traits::ApiResult;
use xemphim_api::types::{
    Ack, Episode, Favorite, Film, LoginRequest, LoginResponse, NewWatchEntry, ProfileUpdate,
    ProgressUpdate, RateResponse, RegisterRequest, RegisterResponse, RelatedFilm, Review,
    UserProfile, UserRating, ViewCount, WatchHistoryEntry,
};
use xemphim_api::{ApiError, Backend};

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Status(u16),
}

/// Each endpoint answers with a scripted reply; unscripted ones 404.
/// Every call is recorded as `"<endpoint> <args>"`.
#[derive(Debug, Default)]
pub struct MockBackend {
    replies: Mutex<HashMap<&'static str, Reply>>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(self, endpoint: &'static str, body: Value) -> Self {
        self.script(endpoint, Reply::Json(body));
        self
    }

    pub fn fail(self, endpoint: &'static str, status: u16) -> Self {
        self.script(endpoint, Reply::Status(status));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls to `endpoint`.
    pub fn count(&self, endpoint: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(endpoint))
            .count()
    }

    /// Recorded calls to `endpoint`, arguments only.
    pub fn calls_to(&self, endpoint: &str) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|c| {
                let (name, args) = c.split_once(' ').unwrap_or((c.as_str(), ""));
                (name == endpoint).then(|| args.to_string())
            })
            .collect()
    }

    fn script(&self, endpoint: &'static str, reply: Reply) {
        self.replies.lock().unwrap().insert(endpoint, reply);
    }

    fn raw(&self, endpoint: &'static str, args: String) -> ApiResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{endpoint} {args}").trim_end().to_string());
        match self.replies.lock().unwrap().get(endpoint).cloned() {
            Some(Reply::Json(v)) => Ok(v),
            Some(Reply::Status(status)) => Err(ApiError::Api {
                status,
                message: format!("scripted {status}"),
            }),
            None => Err(ApiError::Api {
                status: 404,
                message: format!("{endpoint} not scripted"),
            }),
        }
    }

    fn reply<T: DeserializeOwned>(&self, endpoint: &'static str, args: String) -> ApiResult<T> {
        let value = self.raw(endpoint, args)?;
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl Backend for MockBackend {
    async fn login(&self, req: &LoginRequest) -> ApiResult<LoginResponse> {
        self.reply("login", req.username.clone())
    }

    async fn register(&self, req: &RegisterRequest) -> ApiResult<RegisterResponse> {
        self.reply("register", format!("{} {}", req.username, req.email))
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        self.reply("profile", String::new())
    }

    async fn verify_token(&self) -> ApiResult<UserProfile> {
        self.reply("verify_token", String::new())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<()> {
        self.raw("update_profile", format!("{update:?}")).map(|_| ())
    }

    async fn update_account(&self, update: &ProfileUpdate) -> ApiResult<Ack> {
        self.reply("update_account", format!("{update:?}"))
    }

    async fn films(&self) -> ApiResult<Vec<Film>> {
        self.reply("films", String::new())
    }

    async fn film(&self, id: &str) -> ApiResult<Film> {
        self.reply("film", id.to_string())
    }

    async fn top_films(&self, limit: u32) -> ApiResult<Vec<Film>> {
        self.reply("top_films", limit.to_string())
    }

    async fn episodes(&self, film_id: &str) -> ApiResult<Vec<Episode>> {
        self.reply("episodes", film_id.to_string())
    }

    async fn related(&self, film_id: &str) -> ApiResult<Vec<RelatedFilm>> {
        self.reply("related", film_id.to_string())
    }

    async fn reviews(&self, film_id: &str) -> ApiResult<Vec<Review>> {
        self.reply("reviews", film_id.to_string())
    }

    async fn add_view(&self, film_id: &str, user_id: &str) -> ApiResult<ViewCount> {
        self.reply("add_view", format!("{film_id} {user_id}"))
    }

    async fn rate(
        &self,
        film_id: &str,
        rating: f32,
        user_id: Option<&str>,
    ) -> ApiResult<RateResponse> {
        self.reply(
            "rate",
            format!("{film_id} {rating} {}", user_id.unwrap_or("-")),
        )
    }

    async fn user_ratings(&self, user_id: &str) -> ApiResult<Vec<UserRating>> {
        self.reply("user_ratings", user_id.to_string())
    }

    async fn favorites(&self, user_id: &str) -> ApiResult<Vec<Favorite>> {
        let raw: Vec<Value> = self.reply("favorites", user_id.to_string())?;
        Ok(normalize_favorite_list(&raw))
    }

    async fn add_favorite(&self, user_id: &str, film_id: &str) -> ApiResult<()> {
        self.raw("add_favorite", format!("{user_id} {film_id}"))
            .map(|_| ())
    }

    async fn remove_favorite(&self, film_id: &str) -> ApiResult<()> {
        self.raw("remove_favorite", film_id.to_string()).map(|_| ())
    }

    async fn record_watch(&self, entry: &NewWatchEntry) -> ApiResult<()> {
        self.raw(
            "record_watch",
            format!("{} {} {}", entry.user_id, entry.movie_id, entry.episode_id),
        )
        .map(|_| ())
    }

    async fn watch_history(&self, user_id: &str) -> ApiResult<Vec<WatchHistoryEntry>> {
        let raw: Vec<Value> = self.reply("watch_history", user_id.to_string())?;
        Ok(normalize_history_list(&raw))
    }

    async fn update_watch_progress(
        &self,
        user_id: &str,
        film_id: &str,
        update: &ProgressUpdate,
    ) -> ApiResult<()> {
        self.raw(
            "update_watch_progress",
            format!("{user_id} {film_id} {} {}", update.progress, update.watched),
        )
        .map(|_| ())
    }
}
