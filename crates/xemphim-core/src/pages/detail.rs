use chrono::Utc;
use xemphim_api::types::{Episode, Film, NewWatchEntry, ProgressUpdate, RelatedFilm, Review};
use xemphim_api::{ApiError, Backend};

use crate::diagnostics::DiagnosticEvent;
use crate::fallback::{self, Loaded, Origin};
use crate::notice::{Modal, Notice};
use crate::pages::{Action, AuthScope, Services};
use crate::route::DetailQuery;
use crate::widgets::rating::RatingErrorKind;
use crate::widgets::{
    FavoriteIntent, FavoriteSet, Player, ProgressTracker, RatingControl, RatingOutcome, Stars,
};

const MISSING_ID: &str = "Anime ID not provided";
const FILM_ERROR: &str = "Failed to load anime details. Please try again later.";
const ANONYMOUS: &str = "anonymous";
/// Episode id used when a film without episodes is played whole.
const FULL_FEATURE_ID: &str = "main";

/// Film detail page with the embedded player.
#[derive(Debug, Default)]
pub struct Detail {
    pub film_id: Option<String>,
    pub film: Option<Loaded<Film>>,
    pub episodes: Loaded<Vec<Episode>>,
    pub related: Loaded<Vec<RelatedFilm>>,
    pub reviews: Loaded<Vec<Review>>,
    pub error: Option<String>,
    pub loading: bool,
    pub logged_in: bool,
    pub username: Option<String>,
    pub favorites: FavoriteSet,
    pub rating: RatingControl,
    pub player: Player,
    progress: ProgressTracker,
}

impl Detail {
    /// Open the page for `query`, loading everything and applying any
    /// pending resume.
    pub async fn open<B: Backend>(svc: &Services<B>, query: DetailQuery) -> (Self, Action) {
        let mut page = Self {
            logged_in: svc.session.is_logged_in(),
            username: svc.session.username(),
            progress: ProgressTracker::new(
                svc.config.playback.report_step,
                svc.config.playback.watched_threshold,
            ),
            loading: true,
            ..Self::default()
        };

        let Some(film_id) = query.id.clone().filter(|id| !id.is_empty()) else {
            page.error = Some(MISSING_ID.into());
            page.loading = false;
            return (page, Action::None);
        };
        page.film_id = Some(film_id.clone());

        if query.resume {
            let episode_id = query
                .episode_id
                .clone()
                .or_else(|| svc.session.resume_episode_id());
            if let Some(episode_id) = episode_id {
                svc.session.set_resume_episode(&episode_id);
            }
        }

        let film = match svc.backend.film(&film_id).await {
            Ok(film) => Loaded::live(film),
            Err(e) if svc.degraded().enabled() => {
                svc.degraded()
                    .resolve("film", Err(e), || fallback::film_detail(&film_id))
            }
            Err(e) => {
                svc.degraded().note_failure("film", &e);
                page.error = Some(FILM_ERROR.into());
                page.loading = false;
                return (page, Action::None);
            }
        };
        page.film = Some(film);

        let (episodes, related, reviews) = futures::join!(
            svc.backend.episodes(&film_id),
            svc.backend.related(&film_id),
            svc.backend.reviews(&film_id),
        );
        page.episodes = svc.degraded().resolve("episodes", episodes, fallback::episodes);
        page.related = svc.degraded().resolve("related", related, fallback::related);
        page.reviews = svc.degraded().resolve("reviews", reviews, fallback::reviews);

        if page.episodes.origin == Origin::Fallback {
            if let Some(first) = page.episodes.data.first() {
                page.player.select(first.clone());
            }
        }

        let mut action = page.load_user_state(svc, &film_id).await;
        page.loading = false;

        if query.resume {
            action = action.then(page.apply_resume(svc).await);
        }
        (page, action)
    }

    async fn load_user_state<B: Backend>(&mut self, svc: &Services<B>, film_id: &str) -> Action {
        let Some(user_id) = svc.user_id() else {
            return Action::None;
        };
        let (favorites, ratings) = futures::join!(
            svc.backend.favorites(&user_id),
            svc.backend.user_ratings(&user_id),
        );

        let mut action = Action::None;
        match favorites {
            Ok(list) => {
                // Match on the movie id or on a bare favorite document id.
                let hit = list.iter().any(|f| {
                    f.movie_id == film_id || f.film.as_ref().is_some_and(|d| d.id == film_id)
                });
                self.favorites = if hit {
                    FavoriteSet::from_ids([film_id])
                } else {
                    FavoriteSet::new()
                };
            }
            Err(e) => {
                svc.degraded().note_failure("favorites", &e);
                action = action.then(self.unauthorized(svc, &e, "favorites"));
            }
        }

        let own = match ratings {
            Ok(list) => list
                .into_iter()
                .find(|r| r.movie_id == film_id)
                .and_then(|r| Stars::new(r.rating)),
            Err(e) => {
                tracing::debug!("User ratings unavailable: {e}");
                None
            }
        };
        let from_film = self
            .film
            .as_ref()
            .and_then(|f| f.data.user_rating)
            .and_then(Stars::new);
        self.rating = RatingControl::new(own.or(from_film));
        action
    }

    /// Play the stored resume episode, queue the stored offset and clear
    /// both markers. Markers stay if the episode is not in the list.
    async fn apply_resume<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        let Some(episode_id) = svc.session.resume_episode_id() else {
            return Action::None;
        };
        if !self.episodes.data.iter().any(|e| e.id == episode_id) {
            tracing::debug!(%episode_id, "Resume episode not in list");
            return Action::None;
        }
        let offset = svc.session.resume_time();
        let action = self.play_episode(svc, &episode_id).await;
        if let Some(offset) = offset {
            self.player.queue_seek(offset);
        }
        svc.session.clear_resume();
        tracing::info!(%episode_id, ?offset, "resumed playback");
        action
    }

    pub fn film(&self) -> Option<&Film> {
        self.film.as_ref().map(|f| &f.data)
    }

    pub fn episode(&self, episode_id: &str) -> Option<&Episode> {
        self.episodes.data.iter().find(|e| e.id == episode_id)
    }

    pub fn is_favorite(&self) -> bool {
        self.film_id
            .as_deref()
            .is_some_and(|id| self.favorites.contains(id))
    }

    /// Start an episode: bump the view count and open a history record.
    pub async fn play_episode<B: Backend>(&mut self, svc: &Services<B>, episode_id: &str) -> Action {
        let (Some(film_id), Some(episode)) = (self.film_id.clone(), self.episode(episode_id).cloned())
        else {
            return Action::None;
        };
        self.player.play(episode.clone());
        self.progress.reset();

        let user_id = svc.user_id();
        let viewer = user_id.clone().unwrap_or_else(|| ANONYMOUS.into());
        let entry = user_id.map(|user_id| NewWatchEntry {
            user_id,
            movie_id: film_id.clone(),
            episode_id: episode.id.clone(),
            episode_number: episode.number,
            progress: 0,
            watched: false,
            timestamp: Utc::now(),
            duration: Some(episode.duration.clone()).filter(|d| !d.is_empty()),
            image: self.film().map(|f| f.image.clone()).filter(|i| !i.is_empty()),
            movie_name: self.film().map(|f| f.name.clone()).filter(|n| !n.is_empty()),
        });

        let history = async {
            match &entry {
                Some(entry) => Some(svc.backend.record_watch(entry).await),
                None => None,
            }
        };
        let (views, history) = futures::join!(svc.backend.add_view(&film_id, &viewer), history);

        let mut action = Action::None;
        let previous = self.film().and_then(|f| f.views).unwrap_or(0);
        let views = match views {
            Ok(count) => count.views.unwrap_or(previous + 1),
            Err(e) => {
                tracing::warn!(film_id, "View count not recorded: {e}");
                self.record_write_failure(svc, "add_view", &e);
                previous + 1
            }
        };
        if let Some(film) = self.film.as_mut() {
            film.data.views = Some(views);
        }

        match history {
            Some(Ok(())) => self.mark_watched(&episode.id),
            Some(Err(e)) => action = action.then(svc.write_failed("record_watch", &e)),
            None => {}
        }
        tracing::info!(film_id, episode = episode.number, "playing episode");
        action
    }

    /// Play button: first episode, or the whole film when there are none.
    pub async fn watch_now<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        if let Some(first) = self.episodes.data.first().map(|e| e.id.clone()) {
            return self.play_episode(svc, &first).await;
        }
        let (Some(film_id), Some(film)) = (self.film_id.clone(), self.film().cloned()) else {
            return Action::None;
        };
        self.player.play(Episode {
            id: FULL_FEATURE_ID.into(),
            number: 1,
            title: format!("{} - Full Movie", film.name),
            thumbnail: film.image.clone(),
            duration: film.duration.clone().unwrap_or_else(|| "1:30:00".into()),
            release_date: film.year.clone(),
            watched: false,
        });
        self.progress.reset();
        let viewer = svc.user_id().unwrap_or_else(|| ANONYMOUS.into());
        let previous = film.views.unwrap_or(0);
        let views = match svc.backend.add_view(&film_id, &viewer).await {
            Ok(count) => count.views.unwrap_or(previous + 1),
            Err(e) => {
                self.record_write_failure(svc, "add_view", &e);
                previous + 1
            }
        };
        if let Some(film) = self.film.as_mut() {
            film.data.views = Some(views);
        }
        Action::None
    }

    /// Advance to the episode numbered one past the current one.
    pub async fn next_episode<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        let Some(current) = self.player.current().map(|e| e.number) else {
            return Action::None;
        };
        match self
            .episodes
            .data
            .iter()
            .find(|e| e.number == current + 1)
            .map(|e| e.id.clone())
        {
            Some(next) => self.play_episode(svc, &next).await,
            None => Action::Notify(Notice::info("Last episode", "You are all caught up.")),
        }
    }

    /// Media finished loading; returns the seek to apply, if one is queued.
    pub fn on_player_ready(&mut self) -> Option<f64> {
        self.player.on_ready()
    }

    /// Player time update; sends a progress checkpoint when one is due.
    pub async fn on_time_update<B: Backend>(
        &mut self,
        svc: &Services<B>,
        position: f64,
        duration: f64,
    ) -> Action {
        self.player.on_time_update(position, duration);
        if !self.player.is_playing() {
            return Action::None;
        }
        let (Some(film_id), Some(episode_id)) = (
            self.film_id.clone(),
            self.player.current().map(|e| e.id.clone()),
        ) else {
            return Action::None;
        };
        let Some(user_id) = svc.user_id() else {
            return Action::None;
        };
        let Some(report) = self.progress.observe(position, duration) else {
            return Action::None;
        };

        svc.record(DiagnosticEvent::ProgressReported {
            film_id: film_id.clone(),
            percent: report.percent,
            watched: report.watched,
        });
        let update = ProgressUpdate {
            progress: report.percent,
            watched: report.watched,
            timestamp: Utc::now(),
        };
        match svc
            .backend
            .update_watch_progress(&user_id, &film_id, &update)
            .await
        {
            Ok(()) => {
                if report.newly_watched {
                    self.mark_watched(&episode_id);
                }
                Action::None
            }
            Err(e) => svc.write_failed("update_watch_progress", &e),
        }
    }

    fn mark_watched(&mut self, episode_id: &str) {
        if let Some(ep) = self.episodes.data.iter_mut().find(|e| e.id == episode_id) {
            ep.watched = true;
        }
        if let Some(ep) = self.player.current_mut().filter(|e| e.id == episode_id) {
            ep.watched = true;
        }
    }

    fn record_write_failure<B: Backend>(
        &self,
        svc: &Services<B>,
        action: &'static str,
        e: &ApiError,
    ) {
        svc.record(DiagnosticEvent::WriteFailed {
            action,
            reason: e.to_string(),
        });
    }

    fn unauthorized<B: Backend>(
        &mut self,
        svc: &Services<B>,
        e: &ApiError,
        scope: &'static str,
    ) -> Action {
        match svc.check_unauthorized(e, AuthScope::Other(scope)) {
            Some(forced) => {
                self.logged_in = false;
                forced
            }
            None => Action::None,
        }
    }

    fn film_name(&self) -> String {
        self.film().map(|f| f.name.clone()).unwrap_or_default()
    }

    /// Heart button.
    pub async fn toggle_favorite<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        let Some(film_id) = self.film_id.clone() else {
            return Action::None;
        };
        match self.favorites.intent(self.logged_in, &film_id) {
            FavoriteIntent::LoginRequired => Action::ShowModal(Modal::LoginRequired {
                film_name: self.film().map(|f| f.name.clone()),
            }),
            FavoriteIntent::ConfirmRemove => Action::ShowModal(Modal::ConfirmRemoveFavorite {
                film_id,
                film_name: self.film_name(),
            }),
            FavoriteIntent::Add => {
                let Some(user_id) = svc.user_id() else {
                    return Action::Notify(Notice::error(
                        "Authentication Error",
                        "Unable to identify user. Please log in again.",
                    ));
                };
                match self.favorites.add(&svc.backend, &user_id, &film_id).await {
                    Ok(()) => Action::ShowModal(Modal::FavoriteChanged {
                        film_name: self.film_name(),
                        added: true,
                    }),
                    Err(e) => self.favorite_failed(svc, &e),
                }
            }
        }
    }

    pub async fn confirm_remove_favorite<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        let Some(film_id) = self.film_id.clone() else {
            return Action::None;
        };
        if !self.logged_in {
            return Action::ShowModal(Modal::LoginRequired {
                film_name: self.film().map(|f| f.name.clone()),
            });
        }
        match self.favorites.remove(&svc.backend, &film_id).await {
            Ok(()) => Action::ShowModal(Modal::FavoriteChanged {
                film_name: self.film_name(),
                added: false,
            }),
            Err(e) => self.favorite_failed(svc, &e),
        }
    }

    fn favorite_failed<B: Backend>(&mut self, svc: &Services<B>, e: &ApiError) -> Action {
        match self.unauthorized(svc, e, "favorites") {
            Action::None => Action::Notify(Notice::error(
                "Favorite update failed",
                e.user_message(),
            )),
            forced => forced,
        }
    }

    /// Star rating widget under the player.
    pub async fn rate<B: Backend>(&mut self, svc: &Services<B>, value: f32) -> Action {
        if !self.logged_in {
            return Action::ShowModal(Modal::LoginRequired {
                film_name: self.film().map(|f| f.name.clone()),
            });
        }
        let Some(film_id) = self.film_id.clone() else {
            return Action::Notify(Notice::error(
                "Rating Failed",
                "Unable to rate movie. Missing movie ID.",
            ));
        };
        let Some(stars) = Stars::new(value) else {
            return Action::Notify(Notice::error(
                "Invalid Rating",
                "Rating must be between 1 and 5 stars.",
            ));
        };
        if self.rating.is_duplicate(stars) {
            return Action::ShowModal(Modal::DuplicateRating { value: stars });
        }
        let Some(user_id) = svc.user_id() else {
            return Action::Notify(Notice::error(
                "Authentication Error",
                "Unable to identify user. Please log in again.",
            ));
        };

        match self
            .rating
            .submit(&svc.backend, &film_id, Some(&user_id), stars)
            .await
        {
            RatingOutcome::Rated { average, count, .. } => {
                if let Some(film) = self.film.as_mut() {
                    let film = &mut film.data;
                    film.rating = average.or(film.rating);
                    film.rating_count = count.or(Some(film.rating_count.unwrap_or(0) + 1));
                    film.user_rating = Some(stars.value());
                }
                Action::Notify(Notice::success(
                    "Rating Submitted",
                    format!("You rated {} {stars} stars.", self.film_name()),
                ))
            }
            RatingOutcome::Duplicate(value) => Action::ShowModal(Modal::DuplicateRating { value }),
            RatingOutcome::Failed {
                kind,
                message,
                unauthorized,
            } => {
                if unauthorized {
                    if let Some(forced) = svc.on_unauthorized(AuthScope::Other("rate")) {
                        self.logged_in = false;
                        return forced;
                    }
                }
                let title = match kind {
                    RatingErrorKind::MissingId => "Missing Information",
                    RatingErrorKind::InvalidRating => "Invalid Rating",
                    RatingErrorKind::Validation => "Rating Failed",
                };
                Action::Notify(Notice::error(title, message.clone()))
                    .then(Action::ShowModal(Modal::RatingFailed { kind, message }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::pages::fixtures::{logged_in, services};
    use crate::testing::MockBackend;
    use crate::widgets::ResumeMarker;

    fn episodes_json() -> Value {
        json!([
            { "_id": "e1", "number": 1, "title": "One", "duration": "24:00" },
            { "_id": "e2", "number": 2, "title": "Two", "duration": "24:00" },
            { "_id": "e3", "number": 3, "title": "Three", "duration": "24:00" }
        ])
    }

    fn live_backend() -> MockBackend {
        MockBackend::new()
            .ok("film", json!({ "_id": "m1", "name": "Frieren", "image": "f.jpg", "views": 10, "rating": 4.0, "ratingCount": 3 }))
            .ok("episodes", episodes_json())
            .ok("related", json!([]))
            .ok("reviews", json!([]))
            .ok("favorites", json!([]))
            .ok("user_ratings", json!([]))
            .ok("add_view", json!({ "views": 11 }))
            .ok("record_watch", Value::Null)
            .ok("update_watch_progress", Value::Null)
    }

    #[tokio::test]
    async fn test_missing_id() {
        let svc = services(MockBackend::new());
        let (page, action) = Detail::open(&svc, DetailQuery::default()).await;
        assert_eq!(page.error.as_deref(), Some("Anime ID not provided"));
        assert_eq!(action, Action::None);
        assert!(svc.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_open_falls_back_per_resource() {
        let backend = MockBackend::new()
            .fail("film", 500)
            .fail("episodes", 500)
            .ok("related", json!([{ "_id": "r1", "name": "Mushishi" }]))
            .fail("reviews", 500);
        let svc = services(backend);
        let (page, _) = Detail::open(&svc, DetailQuery::film("abc")).await;

        let film = page.film.as_ref().unwrap();
        assert_eq!(film.origin, Origin::Fallback);
        assert_eq!(film.data.id, "abc");
        assert_eq!(page.episodes.data.len(), 26);
        assert_eq!(page.player.current().map(|e| e.id.as_str()), Some("ep-1"));
        assert!(!page.player.is_playing());
        assert!(page.related.is_live());
        assert_eq!(page.related.data.len(), 1);
        assert_eq!(page.reviews.data.len(), 3);
    }

    #[tokio::test]
    async fn test_play_records_view_and_history() {
        let svc = logged_in(live_backend());
        let (mut page, _) = Detail::open(&svc, DetailQuery::film("m1")).await;

        page.play_episode(&svc, "e2").await;
        assert!(page.player.is_playing());
        assert_eq!(page.film().unwrap().views, Some(11));
        assert_eq!(svc.backend.calls_to("add_view"), vec!["m1 u1"]);
        assert_eq!(svc.backend.calls_to("record_watch"), vec!["u1 m1 e2"]);
        assert!(page.episode("e2").unwrap().watched);
    }

    #[tokio::test]
    async fn test_anonymous_play_counts_view_only() {
        let backend = live_backend().fail("add_view", 500);
        let svc = services(backend);
        let (mut page, _) = Detail::open(&svc, DetailQuery::film("m1")).await;

        page.play_episode(&svc, "e1").await;
        assert_eq!(svc.backend.calls_to("add_view"), vec!["m1 anonymous"]);
        assert_eq!(svc.backend.count("record_watch"), 0);
        // Optimistic bump when the counter call fails.
        assert_eq!(page.film().unwrap().views, Some(11));
    }

    #[tokio::test]
    async fn test_progress_reports() {
        let svc = logged_in(live_backend());
        let (mut page, _) = Detail::open(&svc, DetailQuery::film("m1")).await;
        page.play_episode(&svc, "e3").await;

        for second in [0.0, 50.0, 100.0, 101.0, 1296.0, 1300.0] {
            page.on_time_update(&svc, second, 1440.0).await;
        }
        // 100s = 7%, 101s = 7%: nothing. 1296s = 90%, 1300s = 90% again.
        assert_eq!(svc.backend.calls_to("update_watch_progress"), vec!["u1 m1 90 true"]);
    }

    #[tokio::test]
    async fn test_resume_from_profile_marker() {
        let svc = logged_in(live_backend());
        svc.session.set_resume(&ResumeMarker {
            episode_id: "e2".into(),
            offset_secs: 300.0,
        });
        let query = DetailQuery {
            id: Some("m1".into()),
            resume: true,
            episode_id: None,
        };
        let (mut page, _) = Detail::open(&svc, query).await;

        assert_eq!(page.player.current().map(|e| e.id.as_str()), Some("e2"));
        assert!(page.player.is_playing());
        assert_eq!(page.on_player_ready(), Some(300.0));
        assert!(svc.session.resume_episode_id().is_none());
        assert!(svc.session.resume_time().is_none());
    }

    #[tokio::test]
    async fn test_resume_query_episode_wins() {
        let svc = logged_in(live_backend());
        svc.session.set_resume_episode("e1");
        let query = DetailQuery {
            id: Some("m1".into()),
            resume: true,
            episode_id: Some("e3".into()),
        };
        let (page, _) = Detail::open(&svc, query).await;
        assert_eq!(page.player.current().map(|e| e.id.as_str()), Some("e3"));
        assert_eq!(page.player.pending_seek(), None);
    }

    #[tokio::test]
    async fn test_favorite_toggle_shows_changed_modal() {
        let backend = live_backend()
            .ok("add_favorite", Value::Null)
            .ok("remove_favorite", Value::Null);
        let svc = logged_in(backend);
        let (mut page, _) = Detail::open(&svc, DetailQuery::film("m1")).await;

        let added = page.toggle_favorite(&svc).await;
        assert_eq!(
            added,
            Action::ShowModal(Modal::FavoriteChanged {
                film_name: "Frieren".into(),
                added: true
            })
        );
        assert!(page.is_favorite());

        let confirm = page.toggle_favorite(&svc).await;
        assert!(matches!(
            confirm,
            Action::ShowModal(Modal::ConfirmRemoveFavorite { .. })
        ));
        page.confirm_remove_favorite(&svc).await;
        assert!(!page.is_favorite());
    }

    #[tokio::test]
    async fn test_existing_favorite_detected_by_document_id() {
        let backend = live_backend().ok(
            "favorites",
            json!([{ "movieId": { "_id": "m1", "name": "Frieren" } }]),
        );
        let svc = logged_in(backend);
        let (page, _) = Detail::open(&svc, DetailQuery::film("m1")).await;
        assert!(page.is_favorite());
    }

    #[tokio::test]
    async fn test_rate_success_and_duplicate() {
        let backend = live_backend().ok("rate", json!({ "success": true }));
        let svc = logged_in(backend);
        let (mut page, _) = Detail::open(&svc, DetailQuery::film("m1")).await;

        let action = page.rate(&svc, 4.5).await;
        assert!(matches!(action, Action::Notify(ref n) if n.title == "Rating Submitted"));
        assert_eq!(page.film().unwrap().rating_count, Some(4));
        assert_eq!(svc.backend.calls_to("rate"), vec!["m1 4.5 u1"]);

        let again = page.rate(&svc, 4.5).await;
        assert!(matches!(
            again,
            Action::ShowModal(Modal::DuplicateRating { .. })
        ));
        assert_eq!(svc.backend.count("rate"), 1);
    }

    #[tokio::test]
    async fn test_rate_requires_login() {
        let svc = services(live_backend());
        let (mut page, _) = Detail::open(&svc, DetailQuery::film("m1")).await;
        let action = page.rate(&svc, 3.0).await;
        assert!(matches!(
            action,
            Action::ShowModal(Modal::LoginRequired { .. })
        ));
        assert_eq!(svc.backend.count("rate"), 0);
    }

    #[tokio::test]
    async fn test_rate_failure_is_classified() {
        let backend = live_backend().ok(
            "rate",
            json!({ "success": false, "message": "Rating must be a number" }),
        );
        let svc = logged_in(backend);
        let (mut page, _) = Detail::open(&svc, DetailQuery::film("m1")).await;

        let effects = page.rate(&svc, 2.0).await.into_vec();
        assert!(effects.iter().any(|a| matches!(
            a,
            Action::ShowModal(Modal::RatingFailed {
                kind: RatingErrorKind::InvalidRating,
                ..
            })
        )));
        assert_eq!(page.rating.current(), None);
    }

    #[tokio::test]
    async fn test_next_episode() {
        let svc = logged_in(live_backend());
        let (mut page, _) = Detail::open(&svc, DetailQuery::film("m1")).await;
        page.play_episode(&svc, "e1").await;
        page.next_episode(&svc).await;
        assert_eq!(page.player.current().map(|e| e.number), Some(2));
    }
}
