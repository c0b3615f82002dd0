//! Degraded mode: built-in demo content for failed catalog reads.

use xemphim_api::types::{
    Episode, Film, RelatedFilm, Review, UserProfile, WatchHistoryEntry,
};
use xemphim_api::ApiError;

use crate::diagnostics::{record, DiagnosticEvent, SharedEventLog};

/// Where a piece of page data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Live,
    /// Demo content substituted after a failed read.
    Fallback,
    /// The read failed and degraded mode is off.
    Empty,
}

/// Page data tagged with its origin, so demo content is never mistaken
/// for real backend state.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub data: T,
    pub origin: Origin,
}

impl<T> Loaded<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            origin: Origin::Live,
        }
    }

    pub fn is_live(&self) -> bool {
        self.origin == Origin::Live
    }
}

impl<T: Default> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            origin: Origin::Empty,
        }
    }
}

/// Decides what a failed read turns into.
#[derive(Debug, Clone)]
pub struct DegradedMode {
    enabled: bool,
    log: SharedEventLog,
}

impl DegradedMode {
    pub fn new(enabled: bool, log: SharedEventLog) -> Self {
        Self { enabled, log }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Pass live data through; on failure serve `fallback` (or an empty
    /// value when degraded mode is off) and log it.
    pub fn resolve<T: Default>(
        &self,
        resource: &'static str,
        result: Result<T, ApiError>,
        fallback: impl FnOnce() -> T,
    ) -> Loaded<T> {
        match result {
            Ok(data) => Loaded::live(data),
            Err(e) if self.enabled => {
                tracing::warn!(resource, "Read failed, serving demo content: {e}");
                record(
                    &self.log,
                    DiagnosticEvent::FallbackServed {
                        resource,
                        reason: e.to_string(),
                    },
                );
                Loaded {
                    data: fallback(),
                    origin: Origin::Fallback,
                }
            }
            Err(e) => self.empty(resource, &e),
        }
    }

    /// Failed read with no demo content at all.
    pub fn empty<T: Default>(&self, resource: &'static str, error: &ApiError) -> Loaded<T> {
        self.note_failure(resource, error);
        Loaded::default()
    }

    /// Log a failed read whose result the page simply goes without.
    pub fn note_failure(&self, resource: &'static str, error: &ApiError) {
        tracing::warn!(resource, "Read failed: {error}");
        record(
            &self.log,
            DiagnosticEvent::ReadFailed {
                resource,
                reason: error.to_string(),
            },
        );
    }
}

fn film(id: &str, name: &str, image: &str, category: &str) -> Film {
    Film {
        id: id.into(),
        name: name.into(),
        image: image.into(),
        category: Some(category.into()),
        ..Film::default()
    }
}

/// Home grid.
pub fn films() -> Vec<Film> {
    vec![
        film("1", "Fate / Stay Night: Unlimited Blade Works", "details-pic.jpg", "Fantasy"),
        film("2", "Attack on Titan", "trending-1.jpg", "Action"),
        film("3", "One Punch Man", "trending-2.jpg", "Comedy"),
        film("4", "Demon Slayer", "trending-3.jpg", "Adventure"),
        film("5", "My Hero Academia", "trending-4.jpg", "Action"),
        film("6", "Jujutsu Kaisen", "trending-5.jpg", "Action"),
    ]
}

/// Home carousel: `(title, category, description)`.
pub fn hero() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        (
            "Fate / Stay Night: Unlimited Blade Works",
            "Adventure",
            "After 30 days of travel across the world...",
        ),
        (
            "Demon Slayer: Kimetsu no Yaiba",
            "Action",
            "Tanjiro sets out to become a demon slayer to avenge his family...",
        ),
        (
            "Attack on Titan: Final Season",
            "Drama",
            "The war for Paradis zeroes in on Shiganshina...",
        ),
    ]
}

/// Home sidebar "top views".
pub fn top_films() -> Vec<Film> {
    [
        "Boruto: Naruto next generations",
        "The Seven Deadly Sins: Wrath of the Gods",
        "Sword art online alicization war of underworld",
        "Fate/stay night: Heaven's Feel I. presage flower",
        "Fate stay night unlimited blade works",
    ]
    .into_iter()
    .enumerate()
    .map(|(i, name)| Film {
        id: format!("tv-{}", i + 1),
        name: name.into(),
        image: format!("/img/sidebar/tv-{}.jpg", i + 1),
        views: Some(9141),
        ..Film::default()
    })
    .collect()
}

/// Detail page film, keeping the requested id.
pub fn film_detail(id: &str) -> Film {
    Film {
        id: id.into(),
        name: "Demon Slayer: Kimetsu no Yaiba".into(),
        image: "details-pic.jpg".into(),
        cover: Some("details-bg.jpg".into()),
        trailer: Some("https://www.youtube.com/watch?v=VQGCKyvzIM4".into()),
        category: Some("Action, Fantasy, Historical".into()),
        description: Some(
            "Tanjiro Kamado's life changed forever when his family was slaughtered by demons, \
             and his sister Nezuko was transformed into one. Now, he hunts demons as a member \
             of the Demon Slayer Corps, seeking a way to turn his sister back into a human and \
             avenge his family."
                .into(),
        ),
        episode_count: Some(26),
        duration: Some("24 min/ep".into()),
        status: Some("Ongoing".into()),
        year: Some("2019".into()),
        quality: Some("HD".into()),
        views: Some(9_480_000),
        rating: Some(4.9),
        rating_count: Some(1000),
        studio: Some("ufotable".into()),
        user_rating: None,
    }
}

pub fn episodes() -> Vec<Episode> {
    (1..=26u32)
        .map(|n| {
            let title = match n {
                1 => "Cruelty".to_string(),
                2 => "Trainer Sakonji Urokodaki".to_string(),
                3 => "Sabito and Makomo".to_string(),
                _ => format!("Adventure {n}"),
            };
            let i = n - 1;
            Episode {
                id: format!("ep-{n}"),
                number: n,
                title: format!("Episode {n}: {title}"),
                thumbnail: format!("episodes/ep-{}.jpg", i % 5 + 1),
                duration: "24:15".into(),
                release_date: Some(format!("2019-{}-{}", i / 4 + 4, (i % 4 + 1) * 7)),
                watched: n <= 3,
            }
        })
        .collect()
}

pub fn related() -> Vec<RelatedFilm> {
    [
        ("1", "Attack on Titan", "Action", 4.8),
        ("2", "My Hero Academia", "Superhero", 4.7),
        ("3", "Jujutsu Kaisen", "Supernatural", 4.9),
        ("4", "Tokyo Revengers", "Action", 4.6),
    ]
    .into_iter()
    .map(|(id, name, category, rating)| RelatedFilm {
        id: id.into(),
        name: name.into(),
        image: format!("related-{id}.jpg"),
        category: Some(category.into()),
        rating: Some(rating),
    })
    .collect()
}

pub fn reviews() -> Vec<Review> {
    let review = |id: &str, username: &str, rating: f32, comment: &str, date: &str, likes, dislikes| {
        Review {
            id: id.into(),
            username: username.into(),
            avatar: format!("/img/user/avatar-{id}.jpg"),
            rating,
            comment: comment.into(),
            date: date.into(),
            likes,
            dislikes,
        }
    };
    vec![
        review(
            "1",
            "animefan42",
            5.0,
            "This has to be one of the best anime I've ever watched. The animation quality is \
             breathtaking, especially during the fight scenes.",
            "2023-04-15",
            347,
            12,
        ),
        review(
            "2",
            "otakulover",
            4.5,
            "Great character development and beautiful animation. The music score is \
             outstanding. Some episodes feel a bit slow.",
            "2023-03-22",
            215,
            18,
        ),
        review(
            "3",
            "samuraid",
            5.0,
            "The fight choreography is on another level. Each battle feels unique and the \
             animation is fluid.",
            "2023-02-10",
            189,
            5,
        ),
    ]
}

pub fn profile() -> UserProfile {
    UserProfile {
        id: "1".into(),
        username: "anime_lover".into(),
        email: "user@example.com".into(),
        profile_image: Some("/img/user/default-avatar.jpg".into()),
        bio: Some("Anime enthusiast and collector. I love watching fantasy and action anime!".into()),
        created_at: Some("2023-05-15".into()),
        watched_count: 45,
        favorite_count: 12,
    }
}

pub fn favorites() -> Vec<Film> {
    [
        ("1", "Demon Slayer", "trending-1.jpg", "Action", 12500, 4.9),
        ("2", "Attack on Titan", "trending-2.jpg", "Action", 9800, 4.8),
        ("3", "My Hero Academia", "trending-3.jpg", "Superhero", 8700, 4.7),
        ("4", "Jujutsu Kaisen", "trending-4.jpg", "Supernatural", 7600, 4.9),
        ("5", "One Punch Man", "trending-5.jpg", "Comedy", 6500, 4.6),
    ]
    .into_iter()
    .map(|(id, name, image, category, views, rating)| Film {
        views: Some(views),
        rating: Some(rating),
        ..film(id, name, image, category)
    })
    .collect()
}

pub fn history() -> Vec<WatchHistoryEntry> {
    [
        ("6", "Tokyo Revengers", "recent-1.jpg", "Action", 24),
        ("7", "Chainsaw Man", "recent-2.jpg", "Supernatural", 12),
        ("8", "Spy x Family", "recent-3.jpg", "Comedy", 25),
        ("4", "Jujutsu Kaisen", "trending-4.jpg", "Supernatural", 8),
        ("9", "Vinland Saga", "recent-4.jpg", "Historical", 12),
        ("10", "Blue Lock", "recent-5.jpg", "Sports", 15),
    ]
    .into_iter()
    .map(|(id, name, image, category, episode)| WatchHistoryEntry {
        movie_id: id.into(),
        movie_name: Some(name.into()),
        image: Some(image.into()),
        category: Some(category.into()),
        episode_id: None,
        episode_number: Some(episode),
        progress: 100,
        watched: true,
        position_secs: None,
        duration_secs: None,
        timestamp: None,
    })
    .collect()
}
