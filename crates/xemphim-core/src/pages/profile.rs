use futures::future::join_all;
use xemphim_api::types::{Film, ProfileUpdate, UserProfile, UserRating, WatchHistoryEntry};
use xemphim_api::{ApiError, Backend};

use crate::fallback::{self, Loaded, Origin};
use crate::notice::{Modal, Notice};
use crate::pages::{Action, AuthScope, Services};
use crate::route::{DetailQuery, Route};
use crate::session::SessionUser;
use crate::widgets::ResumeMarker;

const INVALID_USER: &str = "Invalid user data received";

/// The signed-in user's profile: identity, favorites, history, ratings.
#[derive(Debug, Default)]
pub struct Profile {
    pub user: Option<Loaded<UserProfile>>,
    pub favorites: Loaded<Vec<Film>>,
    pub history: Loaded<Vec<WatchHistoryEntry>>,
    pub ratings: Loaded<Vec<UserRating>>,
    pub error: Option<String>,
    pub loading: bool,
}

impl Profile {
    /// Open the page. Without a token this goes straight to login.
    pub async fn open<B: Backend>(svc: &Services<B>) -> (Self, Action) {
        let mut page = Self::default();
        if !svc.session.is_logged_in() {
            return (page, Action::Navigate(Route::Login));
        }
        let action = page.load(svc).await;
        (page, action)
    }

    /// Fetch the profile, then favorites, history and ratings together.
    pub async fn load<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        self.loading = true;
        let profile = match svc.backend.profile().await {
            Ok(profile) if profile.id.is_empty() => Err(INVALID_USER.to_string()),
            Ok(profile) => Ok(profile),
            Err(e) => {
                if let Some(forced) = svc.check_unauthorized(&e, AuthScope::Profile) {
                    self.loading = false;
                    return forced;
                }
                Err(e.user_message())
            }
        };

        let profile = match profile {
            Ok(profile) => profile,
            Err(message) => {
                tracing::warn!("Profile unavailable: {message}");
                self.error = Some(message);
                self.serve_demo(svc);
                self.loading = false;
                return Action::None;
            }
        };

        svc.session.remember_user(&SessionUser {
            id: profile.id.clone(),
            username: profile.username.clone(),
        });
        let user_id = profile.id.clone();
        self.user = Some(Loaded::live(profile));
        self.error = None;

        let (favorites, history, ratings) = futures::join!(
            self.fetch_favorites(svc, &user_id),
            svc.backend.watch_history(&user_id),
            svc.backend.user_ratings(&user_id),
        );

        let mut action = Action::None;
        for e in [favorites.as_ref().err(), history.as_ref().err(), ratings.as_ref().err()]
            .into_iter()
            .flatten()
        {
            if let Some(forced) = svc.check_unauthorized(e, AuthScope::Other("profile data")) {
                action = forced;
                break;
            }
        }

        self.favorites = svc
            .degraded()
            .resolve("favorites", favorites, fallback::favorites);
        self.history = svc.degraded().resolve("history", history, fallback::history);
        self.ratings = match ratings {
            Ok(list) => Loaded::live(list),
            Err(e) => svc.degraded().empty("ratings", &e),
        };
        self.sync_favorite_count();
        self.loading = false;
        action
    }

    /// Favorites as films; bare ids are filled in from the catalog.
    async fn fetch_favorites<B: Backend>(
        &self,
        svc: &Services<B>,
        user_id: &str,
    ) -> Result<Vec<Film>, ApiError> {
        let favorites = svc.backend.favorites(user_id).await?;
        let films = join_all(favorites.into_iter().map(|fav| async move {
            if let Some(film) = fav.film {
                return film;
            }
            match svc.backend.film(&fav.movie_id).await {
                Ok(film) => film,
                Err(e) => {
                    tracing::debug!(movie_id = %fav.movie_id, "Favorite film lookup failed: {e}");
                    Film {
                        id: fav.movie_id,
                        ..Film::default()
                    }
                }
            }
        }))
        .await;
        Ok(films)
    }

    fn serve_demo<B: Backend>(&mut self, svc: &Services<B>) {
        if svc.degraded().enabled() {
            self.user = Some(Loaded {
                data: fallback::profile(),
                origin: Origin::Fallback,
            });
            self.favorites = Loaded {
                data: fallback::favorites(),
                origin: Origin::Fallback,
            };
            self.history = Loaded {
                data: fallback::history(),
                origin: Origin::Fallback,
            };
        } else {
            self.user = None;
            self.favorites = Loaded::default();
            self.history = Loaded::default();
        }
        self.ratings = Loaded::default();
    }

    fn sync_favorite_count(&mut self) {
        let count = self.favorites.data.len() as u32;
        if let Some(user) = self.user.as_mut() {
            user.data.favorite_count = count;
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref().map(|u| &u.data)
    }

    /// Soft edit: username, email, bio. The session stays open.
    pub async fn edit_profile<B: Backend>(
        &mut self,
        svc: &Services<B>,
        update: ProfileUpdate,
    ) -> Action {
        if !svc.session.is_logged_in() {
            return Action::Navigate(Route::Login);
        }
        match svc.backend.update_profile(&update).await {
            Ok(()) => {
                if let Some(user) = self.user.as_mut() {
                    let user = &mut user.data;
                    if let Some(username) = update.username.filter(|u| !u.is_empty()) {
                        svc.session.remember_user(&SessionUser {
                            id: String::new(),
                            username: username.clone(),
                        });
                        user.username = username;
                    }
                    if let Some(email) = update.email.filter(|e| !e.is_empty()) {
                        user.email = email;
                    }
                    if let Some(bio) = update.bio {
                        user.bio = Some(bio);
                    }
                }
                Action::Notify(Notice::success(
                    "Profile Updated",
                    "Your profile has been updated successfully.",
                ))
            }
            Err(e) => self.edit_failed(svc, &e),
        }
    }

    /// Account edit. The backend invalidates the token, so success ends the
    /// session and sends the user back to login.
    pub async fn edit_account<B: Backend>(
        &mut self,
        svc: &Services<B>,
        update: ProfileUpdate,
    ) -> Action {
        if !svc.session.is_logged_in() {
            return Action::Navigate(Route::Login);
        }
        match svc.backend.update_account(&update).await {
            Ok(ack) if ack.success => {
                svc.session.clear();
                *self = Self::default();
                Action::Notify(Notice::success(
                    "Profile Updated",
                    ack.message
                        .unwrap_or_else(|| "Profile updated successfully. Please log in again.".into()),
                ))
                .then(Action::Navigate(Route::Login))
            }
            Ok(ack) => Action::Notify(Notice::error(
                "Update Failed",
                ack.message.unwrap_or_else(|| "Profile update failed.".into()),
            )),
            Err(e) => self.edit_failed(svc, &e),
        }
    }

    fn edit_failed<B: Backend>(&mut self, svc: &Services<B>, e: &ApiError) -> Action {
        tracing::warn!("Profile edit failed: {e}");
        svc.check_unauthorized(e, AuthScope::Other("update profile"))
            .unwrap_or_else(|| Action::Notify(Notice::error("Update Failed", e.user_message())))
    }

    /// Remove button on a favorite card; asks first.
    pub fn request_remove_favorite(&self, film_id: &str) -> Action {
        let film_name = self
            .favorites
            .data
            .iter()
            .find(|f| f.id == film_id)
            .map(|f| f.name.clone())
            .unwrap_or_default();
        Action::ShowModal(Modal::ConfirmRemoveFavorite {
            film_id: film_id.to_string(),
            film_name,
        })
    }

    pub async fn confirm_remove_favorite<B: Backend>(
        &mut self,
        svc: &Services<B>,
        film_id: &str,
    ) -> Action {
        match svc.backend.remove_favorite(film_id).await {
            Ok(()) => {
                self.favorites.data.retain(|f| f.id != film_id);
                if let Some(user) = self.user.as_mut() {
                    user.data.favorite_count = user.data.favorite_count.saturating_sub(1);
                }
                Action::Notify(Notice::success(
                    "Removed",
                    "The film was removed from your favorites.",
                ))
            }
            Err(e) => svc
                .check_unauthorized(&e, AuthScope::Other("favorites"))
                .unwrap_or_else(|| Action::Notify(Notice::error("Remove Failed", e.user_message()))),
        }
    }

    pub async fn add_favorite<B: Backend>(&mut self, svc: &Services<B>, film_id: &str) -> Action {
        if self.favorites.data.iter().any(|f| f.id == film_id) {
            return Action::Notify(Notice::info(
                "Already Favorite",
                "This film is already in your favorites.",
            ));
        }
        let Some(user_id) = svc.user_id() else {
            return Action::Navigate(Route::Login);
        };
        match svc.backend.add_favorite(&user_id, film_id).await {
            Ok(()) => {
                match self.fetch_favorites(svc, &user_id).await {
                    Ok(films) => self.favorites = Loaded::live(films),
                    Err(e) => svc.degraded().note_failure("favorites", &e),
                }
                self.sync_favorite_count();
                Action::Notify(Notice::success("Added", "The film was added to your favorites."))
            }
            Err(e) => svc
                .check_unauthorized(&e, AuthScope::Other("favorites"))
                .unwrap_or_else(|| Action::Notify(Notice::error("Add Failed", e.user_message()))),
        }
    }

    /// Continue watching the `index`th history entry.
    pub fn resume<B: Backend>(&self, svc: &Services<B>, index: usize) -> Action {
        let Some(entry) = self.history.data.get(index) else {
            return Action::None;
        };
        let mut query = DetailQuery::film(entry.movie_id.clone());
        if let Some(marker) = ResumeMarker::from_history(entry) {
            svc.session.set_resume(&marker);
            query.resume = true;
            query.episode_id = Some(marker.episode_id);
        }
        Action::Navigate(Route::Detail(query))
    }

    pub fn logout<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        *self = Self::default();
        Action::Navigate(svc.session.logout())
    }
}
