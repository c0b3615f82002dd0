//! User-facing notifications and modal prompts.

use crate::widgets::rating::{RatingErrorKind, Stars};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient notification with a short title.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, message)
    }
}

/// A blocking prompt the presentation layer must show.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Anonymous user hit an action that needs an account.
    LoginRequired { film_name: Option<String> },
    /// Second click on a favorited film; removal waits for confirmation.
    ConfirmRemoveFavorite { film_id: String, film_name: String },
    /// Favorite add/remove completed.
    FavoriteChanged { film_name: String, added: bool },
    /// The user picked the rating they already gave.
    DuplicateRating { value: Stars },
    RatingFailed { kind: RatingErrorKind, message: String },
}
