//! Plain-text rendering of page state and actions.

use xemphim_api::types::{Episode, Film, UserProfile, WatchHistoryEntry};
use xemphim_core::diagnostics::{DiagnosticEvent, SharedEventLog};
use xemphim_core::fallback::{Loaded, Origin};
use xemphim_core::notice::{Modal, Notice, NoticeKind};
use xemphim_core::pages::Action;
use xemphim_core::route::Route;
use xemphim_core::widgets::{format_time, RatingErrorKind};

/// Print every notice and modal in `action`; returns the last navigation.
pub fn action(action: Action) -> Option<Route> {
    let mut route = None;
    for single in action.into_vec() {
        match single {
            Action::Notify(notice) => print_notice(&notice),
            Action::ShowModal(modal) => print_modal(&modal),
            Action::Navigate(to) => {
                tracing::debug!(%to, "navigate");
                route = Some(to);
            }
            Action::None | Action::Many(_) => {}
        }
    }
    route
}

/// The removal prompt inside `action`, if any.
pub fn confirm_prompt(action: &Action) -> Option<(String, String)> {
    action.clone().into_vec().into_iter().find_map(|a| match a {
        Action::ShowModal(Modal::ConfirmRemoveFavorite { film_id, film_name }) => {
            Some((film_id, film_name))
        }
        _ => None,
    })
}

pub fn print_notice(notice: &Notice) {
    let tag = match notice.kind {
        NoticeKind::Success => "ok",
        NoticeKind::Error => "error",
        NoticeKind::Warning => "warning",
        NoticeKind::Info => "info",
    };
    println!("[{tag}] {}: {}", notice.title, notice.message);
}

pub fn print_modal(modal: &Modal) {
    match modal {
        Modal::LoginRequired { film_name } => match film_name {
            Some(name) => println!("Sign in to save \"{name}\": xemphim login <username>"),
            None => println!("Sign in first: xemphim login <username>"),
        },
        Modal::ConfirmRemoveFavorite { film_name, .. } => {
            println!("\"{film_name}\" is already in your favorites.")
        }
        Modal::FavoriteChanged { film_name, added } => {
            if *added {
                println!("Added \"{film_name}\" to your favorites.");
            } else {
                println!("Removed \"{film_name}\" from your favorites.");
            }
        }
        Modal::DuplicateRating { value } => {
            println!("You already rated this {value} stars.")
        }
        Modal::RatingFailed { kind, message } => {
            let hint = match kind {
                RatingErrorKind::MissingId => "missing film or user id",
                RatingErrorKind::InvalidRating => "rating must be 1-5",
                RatingErrorKind::Validation => "rejected",
            };
            println!("Rating failed ({hint}): {message}");
        }
    }
}

/// Marker printed after a section that came from the offline catalog.
pub fn origin_note<T>(loaded: &Loaded<T>) -> &'static str {
    match loaded.origin {
        Origin::Live => "",
        Origin::Fallback => " (offline sample)",
        Origin::Empty => " (unavailable)",
    }
}

pub fn film_line(film: &Film, favorite: bool, own: Option<f32>) -> String {
    let mut line = format!("{} {}", if favorite { "♥" } else { " " }, film.name);
    if let Some(year) = &film.year {
        line.push_str(&format!(" ({year})"));
    }
    if let Some(category) = &film.category {
        line.push_str(&format!(" [{category}]"));
    }
    if let Some(rating) = film.rating {
        line.push_str(&format!("  ★ {rating:.1}"));
        if let Some(count) = film.rating_count {
            line.push_str(&format!(" ({count})"));
        }
    }
    if let Some(own) = own {
        line.push_str(&format!("  you: {own}"));
    }
    if let Some(views) = film.views {
        line.push_str(&format!("  {views} views"));
    }
    line.push_str(&format!("  id: {}", film.id));
    line
}

pub fn episode_line(episode: &Episode, current: bool) -> String {
    format!(
        "{} {:>3}. {} [{}]{}",
        if current { "▶" } else { " " },
        episode.number,
        episode.title,
        episode.duration,
        if episode.watched { " ✓" } else { "" },
    )
}

pub fn history_line(index: usize, entry: &WatchHistoryEntry) -> String {
    let name = entry.movie_name.as_deref().unwrap_or(&entry.movie_id);
    let episode = entry
        .episode_number
        .map(|n| format!(" ep {n}"))
        .unwrap_or_default();
    let state = if entry.watched {
        "watched".to_string()
    } else {
        format!("{}%", entry.progress)
    };
    let at = match entry.resume_offset() {
        o if o > 0.0 => format!(" at {}", format_time(o)),
        _ => String::new(),
    };
    format!("{index:>3}. {name}{episode} - {state}{at}")
}

pub fn profile_header(user: &UserProfile) {
    println!("{} <{}>", user.username, user.email);
    if let Some(bio) = &user.bio {
        println!("  {bio}");
    }
    if let Some(since) = &user.created_at {
        println!("  member since {since}");
    }
    println!(
        "  {} watched · {} favorites",
        user.watched_count, user.favorite_count
    );
}

pub fn diagnostics(log: &SharedEventLog) {
    let entries = match log.lock() {
        Ok(log) => log.snapshot(),
        Err(_) => return,
    };
    heading(&format!("Diagnostics ({})", entries.len()));
    for (at, event) in entries {
        let line = match event {
            DiagnosticEvent::FallbackServed { resource, reason } => {
                format!("{resource}: served offline sample ({reason})")
            }
            DiagnosticEvent::ReadFailed { resource, reason } => {
                format!("{resource}: read failed ({reason})")
            }
            DiagnosticEvent::WriteFailed { action, reason } => {
                format!("{action}: write failed ({reason})")
            }
            DiagnosticEvent::ForcedLogout { endpoint } => {
                format!("session ended by 401 from {endpoint}")
            }
            DiagnosticEvent::TokenRejected => "stored token rejected".to_string(),
            DiagnosticEvent::ProgressReported {
                film_id,
                percent,
                watched,
            } => format!(
                "progress {film_id} {percent}%{}",
                if watched { " watched" } else { "" }
            ),
        };
        println!("{} {line}", at.format("%H:%M:%S"));
    }
}

pub fn heading(title: &str) {
    println!();
    println!("{title}");
    println!("{:-<60}", "");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_prompt_found_in_chain() {
        let action = Action::Notify(Notice::info("a", "b")).then(Action::ShowModal(
            Modal::ConfirmRemoveFavorite {
                film_id: "1".into(),
                film_name: "One Piece".into(),
            },
        ));
        assert_eq!(
            confirm_prompt(&action),
            Some(("1".to_string(), "One Piece".to_string()))
        );
        assert_eq!(confirm_prompt(&Action::None), None);
    }

    #[test]
    fn test_film_line() {
        let film = Film {
            id: "7".into(),
            name: "Frieren".into(),
            year: Some("2023".into()),
            rating: Some(4.7),
            rating_count: Some(12),
            ..Film::default()
        };
        let line = film_line(&film, true, Some(4.5));
        assert!(line.starts_with("♥ Frieren (2023)"));
        assert!(line.contains("★ 4.7 (12)"));
        assert!(line.contains("you: 4.5"));
        assert!(line.ends_with("id: 7"));
    }

    #[test]
    fn test_last_navigation_wins() {
        let action = Action::Navigate(Route::Home).then(Action::Navigate(Route::Login));
        assert_eq!(self::action(action), Some(Route::Login));
    }
}
