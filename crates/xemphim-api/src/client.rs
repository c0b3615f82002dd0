use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::ApiError;
use crate::normalize::{normalize_favorite_list, normalize_history_list};
use crate::traits::{ApiResult, Backend};
use crate::types::{
    Ack, Episode, Favorite, Film, LoginRequest, LoginResponse, NewFavorite, NewWatchEntry,
    ProfileUpdate, ProgressUpdate, RateRequest, RateResponse, RegisterRequest, RegisterResponse,
    RelatedFilm, Review, UserProfile, UserRating, ViewCount, ViewRequest, WatchHistoryEntry,
};

/// Supplies the bearer token attached to outgoing requests.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// HTTP client for the storefront REST backend.
///
/// Owns the base URL and the bearer-header injection; every call shares
/// the same error normalization in [`ApiClient::check_response`].
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    tokens: Arc<dyn TokenSource>,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::Url(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url(format!("{base_url}: not a base URL")));
        }
        Ok(Self {
            base_url,
            tokens,
            http: Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join percent-encoded path segments onto the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::debug!(%method, %url, "backend request");
        let builder = self.http.request(method, url);
        match self.tokens.bearer_token() {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        }
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
        let resp = Self::check_response(builder.send().await?).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn send_unit(builder: RequestBuilder) -> ApiResult<()> {
        Self::check_response(builder.send().await?).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        Self::send_json(self.request(Method::GET, segments)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<T> {
        Self::send_json(self.request(Method::POST, segments).json(body)).await
    }
}

impl Backend for ApiClient {
    async fn login(&self, req: &LoginRequest) -> ApiResult<LoginResponse> {
        self.post(&["auth", "login"], req).await
    }

    async fn register(&self, req: &RegisterRequest) -> ApiResult<RegisterResponse> {
        self.post(&["users"], req).await
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        self.get(&["auth", "profile"]).await
    }

    async fn verify_token(&self) -> ApiResult<UserProfile> {
        self.get(&["auth", "verify-token"]).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<()> {
        Self::send_unit(
            self.request(Method::PUT, &["auth", "update-profile"])
                .json(update),
        )
        .await
    }

    async fn update_account(&self, update: &ProfileUpdate) -> ApiResult<Ack> {
        Self::send_json(self.request(Method::PUT, &["users", "profile"]).json(update)).await
    }

    async fn films(&self) -> ApiResult<Vec<Film>> {
        self.get(&["movies"]).await
    }

    async fn film(&self, id: &str) -> ApiResult<Film> {
        self.get(&["movies", id]).await
    }

    async fn top_films(&self, limit: u32) -> ApiResult<Vec<Film>> {
        Self::send_json(
            self.request(Method::GET, &["movies", "top"])
                .query(&[("limit", limit)]),
        )
        .await
    }

    async fn episodes(&self, film_id: &str) -> ApiResult<Vec<Episode>> {
        self.get(&["episodes", film_id]).await
    }

    async fn related(&self, film_id: &str) -> ApiResult<Vec<RelatedFilm>> {
        self.get(&["movies", "related", film_id]).await
    }

    async fn reviews(&self, film_id: &str) -> ApiResult<Vec<Review>> {
        self.get(&["reviews", film_id]).await
    }

    async fn add_view(&self, film_id: &str, user_id: &str) -> ApiResult<ViewCount> {
        let body = ViewRequest {
            movie_id: film_id.to_string(),
            user_id: user_id.to_string(),
        };
        self.post(&["movies", "add-view"], &body).await
    }

    async fn rate(
        &self,
        film_id: &str,
        rating: f32,
        user_id: Option<&str>,
    ) -> ApiResult<RateResponse> {
        let body = RateRequest {
            movie_id: film_id.to_string(),
            rating,
            user_id: user_id.map(str::to_string),
        };
        self.post(&["movies", "rate"], &body).await
    }

    async fn user_ratings(&self, user_id: &str) -> ApiResult<Vec<UserRating>> {
        self.get(&["movies", "ratings", "user", user_id]).await
    }

    async fn favorites(&self, user_id: &str) -> ApiResult<Vec<Favorite>> {
        let raw: Vec<serde_json::Value> = self.get(&["favorites", "user", user_id]).await?;
        Ok(normalize_favorite_list(&raw))
    }

    async fn add_favorite(&self, user_id: &str, film_id: &str) -> ApiResult<()> {
        let body = NewFavorite {
            user_id: user_id.to_string(),
            movie_id: film_id.to_string(),
        };
        Self::send_unit(self.request(Method::POST, &["favorites"]).json(&body)).await
    }

    async fn remove_favorite(&self, film_id: &str) -> ApiResult<()> {
        Self::send_unit(self.request(Method::DELETE, &["favorites", film_id])).await
    }

    async fn record_watch(&self, entry: &NewWatchEntry) -> ApiResult<()> {
        Self::send_unit(self.request(Method::POST, &["watch-history"]).json(entry)).await
    }

    async fn watch_history(&self, user_id: &str) -> ApiResult<Vec<WatchHistoryEntry>> {
        let raw: Vec<serde_json::Value> = self.get(&["watch-history", "user", user_id]).await?;
        Ok(normalize_history_list(&raw))
    }

    async fn update_watch_progress(
        &self,
        user_id: &str,
        film_id: &str,
        update: &ProgressUpdate,
    ) -> ApiResult<()> {
        Self::send_unit(
            self.request(
                Method::PATCH,
                &["watch-history", "user", user_id, "movie", film_id],
            )
            .json(update),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(StaticToken(None))).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://localhost:2000");
        assert_eq!(
            c.endpoint(&["movies", "related", "42"]).as_str(),
            "http://localhost:2000/movies/related/42"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("https://api.example.com/v1/");
        assert_eq!(
            c.endpoint(&["favorites", "user", "u1"]).as_str(),
            "https://api.example.com/v1/favorites/user/u1"
        );
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let c = client("http://localhost:2000");
        assert_eq!(
            c.endpoint(&["movies", "a/b c"]).as_str(),
            "http://localhost:2000/movies/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(ApiClient::new("not a url", Arc::new(StaticToken(None))).is_err());
        assert!(ApiClient::new("mailto:me@example.com", Arc::new(StaticToken(None))).is_err());
    }
}
