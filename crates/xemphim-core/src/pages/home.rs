use std::collections::HashMap;

use xemphim_api::types::Film;
use xemphim_api::{ApiError, Backend};

use crate::fallback::{self, Loaded, Origin};
use crate::notice::{Modal, Notice};
use crate::pages::{Action, AuthScope, Services};
use crate::session::SessionUser;
use crate::widgets::{FavoriteIntent, FavoriteSet, RatingControl, RatingOutcome, Stars};

const FILMS_ERROR: &str = "Failed to load films. Please try again later.";
const HERO_CATEGORY: &str = "Adventure";
const HERO_DESCRIPTION: &str = "Experience the adventure of a lifetime...";
const HERO_IMAGE: &str = "/img/hero/hero-1.jpg";
const HERO_COUNT: usize = 3;

/// One slide of the home carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroItem {
    pub title: String,
    pub category: String,
    pub description: String,
    pub image: String,
}

impl HeroItem {
    fn from_film(film: &Film) -> Self {
        Self {
            title: film.name.clone(),
            category: film
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| HERO_CATEGORY.into()),
            description: film
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| HERO_DESCRIPTION.into()),
            image: if film.image.starts_with("http") {
                film.image.clone()
            } else {
                HERO_IMAGE.into()
            },
        }
    }
}

/// Home page: film grid, hero carousel, top-views sidebar.
#[derive(Debug, Default)]
pub struct Home {
    pub films: Loaded<Vec<Film>>,
    pub hero: Vec<HeroItem>,
    pub top: Loaded<Vec<Film>>,
    /// Banner shown when the film grid could not be loaded.
    pub error: Option<String>,
    pub loading: bool,
    pub logged_in: bool,
    pub username: Option<String>,
    pub favorites: FavoriteSet,
    ratings: HashMap<String, RatingControl>,
}

impl Home {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch everything the page shows, concurrently.
    pub async fn load<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        self.loading = true;
        self.logged_in = svc.session.is_logged_in();
        let user_id = svc.user_id();
        let mut action = Action::None;

        let favorites = async {
            match &user_id {
                Some(uid) => Some(svc.backend.favorites(uid).await),
                None => None,
            }
        };
        let ratings = async {
            match &user_id {
                Some(uid) => Some(svc.backend.user_ratings(uid).await),
                None => None,
            }
        };
        let (films, top, favorites, ratings) = futures::join!(
            svc.backend.films(),
            svc.backend.top_films(svc.config.home.top_limit),
            favorites,
            ratings,
        );

        match films {
            Ok(films) => {
                self.hero = films.iter().take(HERO_COUNT).map(HeroItem::from_film).collect();
                self.films = Loaded::live(films);
                self.error = None;
            }
            Err(e) => {
                self.error = Some(FILMS_ERROR.into());
                self.films = svc.degraded().resolve("films", Err(e), fallback::films);
                self.hero = if self.films.origin == Origin::Fallback {
                    fallback::hero()
                        .into_iter()
                        .map(|(title, category, description)| HeroItem {
                            title: title.into(),
                            category: category.into(),
                            description: description.into(),
                            image: HERO_IMAGE.into(),
                        })
                        .collect()
                } else {
                    Vec::new()
                };
            }
        }

        self.top = svc.degraded().resolve("top_films", top, fallback::top_films);

        match favorites {
            Some(Ok(list)) => {
                self.favorites = FavoriteSet::from_ids(list.into_iter().map(|f| f.movie_id));
            }
            Some(Err(e)) => {
                self.favorites = FavoriteSet::new();
                svc.degraded().note_failure("favorites", &e);
                if let Some(forced) = svc.check_unauthorized(&e, AuthScope::Other("favorites")) {
                    self.logged_in = false;
                    action = action.then(forced);
                }
            }
            None => self.favorites = FavoriteSet::new(),
        }

        self.ratings = self
            .films
            .data
            .iter()
            .filter_map(|f| Some((f.id.clone(), RatingControl::new(Stars::new(f.user_rating?)))))
            .collect();
        match ratings {
            Some(Ok(list)) => {
                for r in list {
                    if let Some(stars) = Stars::new(r.rating) {
                        self.ratings.insert(r.movie_id, RatingControl::new(Some(stars)));
                    }
                }
            }
            Some(Err(e)) => tracing::debug!("User ratings unavailable: {e}"),
            None => {}
        }

        if self.logged_in {
            self.username = self.resolve_username(svc).await;
        } else {
            self.username = None;
        }

        self.loading = false;
        tracing::debug!(
            films = self.films.data.len(),
            origin = ?self.films.origin,
            "home loaded"
        );
        action
    }

    async fn resolve_username<B: Backend>(&self, svc: &Services<B>) -> Option<String> {
        if let Some(name) = svc.session.username() {
            return Some(name);
        }
        match svc.backend.profile().await {
            Ok(profile) => {
                svc.session.remember_user(&SessionUser {
                    id: profile.id,
                    username: profile.username.clone(),
                });
                Some(profile.username)
                    .filter(|n| !n.is_empty())
                    .or_else(|| Some("User".into()))
            }
            Err(e) => {
                tracing::debug!("Profile lookup for username failed: {e}");
                Some("User".into())
            }
        }
    }

    pub fn film(&self, film_id: &str) -> Option<&Film> {
        self.films.data.iter().find(|f| f.id == film_id)
    }

    pub fn user_rating(&self, film_id: &str) -> Option<Stars> {
        self.ratings.get(film_id).and_then(RatingControl::current)
    }

    fn film_name(&self, film_id: &str) -> Option<String> {
        self.film(film_id).map(|f| f.name.clone())
    }

    /// Click on a film card's favorite control.
    pub async fn toggle_favorite<B: Backend>(&mut self, svc: &Services<B>, film_id: &str) -> Action {
        match self.favorites.intent(self.logged_in, film_id) {
            FavoriteIntent::LoginRequired => Action::ShowModal(Modal::LoginRequired {
                film_name: self.film_name(film_id),
            }),
            FavoriteIntent::ConfirmRemove => Action::ShowModal(Modal::ConfirmRemoveFavorite {
                film_id: film_id.to_string(),
                film_name: self.film_name(film_id).unwrap_or_default(),
            }),
            FavoriteIntent::Add => {
                let Some(user_id) = svc.user_id() else {
                    return Action::Notify(Notice::error(
                        "Authentication Error",
                        "Unable to identify user. Please log in again.",
                    ));
                };
                match self.favorites.add(&svc.backend, &user_id, film_id).await {
                    Ok(()) => Action::Notify(Notice::success(
                        "Added to favorites",
                        self.film_name(film_id).unwrap_or_default(),
                    )),
                    Err(e) => self.favorite_failed(svc, &e),
                }
            }
        }
    }

    /// The user confirmed removal in the modal.
    pub async fn confirm_remove_favorite<B: Backend>(
        &mut self,
        svc: &Services<B>,
        film_id: &str,
    ) -> Action {
        if !self.logged_in {
            return Action::ShowModal(Modal::LoginRequired {
                film_name: self.film_name(film_id),
            });
        }
        match self.favorites.remove(&svc.backend, film_id).await {
            Ok(()) => Action::Notify(Notice::success(
                "Removed from favorites",
                self.film_name(film_id).unwrap_or_default(),
            )),
            Err(e) => self.favorite_failed(svc, &e),
        }
    }

    fn favorite_failed<B: Backend>(&mut self, svc: &Services<B>, e: &ApiError) -> Action {
        if let Some(forced) = svc.check_unauthorized(e, AuthScope::Other("favorites")) {
            self.logged_in = false;
            return forced;
        }
        Action::Notify(Notice::error("Favorite update failed", e.user_message()))
    }

    /// Star click on a film card.
    pub async fn rate<B: Backend>(&mut self, svc: &Services<B>, film_id: &str, value: f32) -> Action {
        if !self.logged_in {
            return Action::ShowModal(Modal::LoginRequired {
                film_name: self.film_name(film_id),
            });
        }
        let Some(stars) = Stars::new(value) else {
            return Action::Notify(Notice::error(
                "Invalid Rating",
                "Rating must be between 1 and 5 stars.",
            ));
        };
        let user_id = svc.user_id();
        let control = self.ratings.entry(film_id.to_string()).or_default();

        match control
            .submit(&svc.backend, film_id, user_id.as_deref(), stars)
            .await
        {
            RatingOutcome::Rated { average, count, .. } => {
                if let Some(film) = self.films.data.iter_mut().find(|f| f.id == film_id) {
                    film.rating = average.or(film.rating);
                    film.rating_count = count.or(film.rating_count.map(|c| c + 1));
                    film.user_rating = Some(stars.value());
                }
                Action::Notify(Notice::success(
                    "Rating Submitted",
                    format!("You rated this {stars} stars."),
                ))
            }
            RatingOutcome::Duplicate(value) => Action::ShowModal(Modal::DuplicateRating { value }),
            RatingOutcome::Failed {
                message,
                unauthorized,
                ..
            } => {
                if unauthorized {
                    if let Some(forced) = svc.on_unauthorized(AuthScope::Other("rate")) {
                        self.logged_in = false;
                        return forced;
                    }
                }
                Action::Notify(Notice::error("Rating Failed", message))
            }
        }
    }

    /// Header logout button.
    pub fn logout<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        let route = svc.session.logout();
        self.logged_in = false;
        self.username = None;
        self.favorites.clear();
        self.ratings.clear();
        Action::Navigate(route)
    }
}
