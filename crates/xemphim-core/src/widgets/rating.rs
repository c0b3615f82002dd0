use std::fmt;

use xemphim_api::Backend;

/// A star rating: 1 to 5 in half-star steps.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Stars(f32);

impl Stars {
    pub const MIN: f32 = 1.0;
    pub const MAX: f32 = 5.0;

    pub fn new(value: f32) -> Option<Self> {
        let valid = value.is_finite()
            && (Self::MIN..=Self::MAX).contains(&value)
            && (value * 2.0).fract() == 0.0;
        valid.then_some(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why the backend refused a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingErrorKind {
    MissingId,
    InvalidRating,
    Validation,
}

/// Classify a rejection message by the field it complains about.
pub fn classify_rating_error(message: &str) -> RatingErrorKind {
    let lower = message.to_lowercase();
    if lower.contains("userid") || lower.contains("movieid") {
        RatingErrorKind::MissingId
    } else if lower.contains("rating") {
        RatingErrorKind::InvalidRating
    } else {
        RatingErrorKind::Validation
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RatingState {
    Unrated,
    Pending {
        value: Stars,
        previous: Option<Stars>,
    },
    Rated(Stars),
}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RatingOutcome {
    Rated {
        value: Stars,
        /// Film aggregate after this vote, when the backend reports it.
        average: Option<f32>,
        count: Option<u32>,
    },
    /// Same value as the stored rating; nothing was sent.
    Duplicate(Stars),
    Failed {
        kind: RatingErrorKind,
        message: String,
        unauthorized: bool,
    },
}

/// The user's own rating for one film.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingControl {
    state: RatingState,
}

impl Default for RatingControl {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RatingControl {
    pub fn new(existing: Option<Stars>) -> Self {
        let state = match existing {
            Some(value) => RatingState::Rated(value),
            None => RatingState::Unrated,
        };
        Self { state }
    }

    /// The confirmed rating, or the optimistic one while a request is out.
    pub fn current(&self) -> Option<Stars> {
        match self.state {
            RatingState::Unrated => None,
            RatingState::Pending { value, .. } | RatingState::Rated(value) => Some(value),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, RatingState::Pending { .. })
    }

    pub fn is_duplicate(&self, value: Stars) -> bool {
        self.state == RatingState::Rated(value)
    }

    /// Send `value` for `film_id`.
    ///
    /// A value equal to the stored rating is refused without a request. On
    /// failure the control falls back to whatever it held before.
    pub async fn submit<B: Backend>(
        &mut self,
        backend: &B,
        film_id: &str,
        user_id: Option<&str>,
        value: Stars,
    ) -> RatingOutcome {
        if self.is_duplicate(value) {
            return RatingOutcome::Duplicate(value);
        }
        let previous = match self.state {
            RatingState::Rated(v) => Some(v),
            _ => None,
        };
        self.state = RatingState::Pending { value, previous };

        let failed = |message: String, unauthorized: bool| RatingOutcome::Failed {
            kind: classify_rating_error(&message),
            message,
            unauthorized,
        };

        let outcome = match backend.rate(film_id, value.value(), user_id).await {
            Ok(resp) if resp.success || resp.rating.is_some() => RatingOutcome::Rated {
                value,
                average: resp.rating,
                count: resp.rating_count,
            },
            Ok(resp) => failed(
                resp.message
                    .unwrap_or_else(|| "Failed to rate movie".to_string()),
                false,
            ),
            Err(e) => failed(e.user_message(), e.is_unauthorized()),
        };

        self.state = match outcome {
            RatingOutcome::Rated { .. } => RatingState::Rated(value),
            _ => previous.map_or(RatingState::Unrated, RatingState::Rated),
        };
        tracing::debug!(film_id, rating = %value, ?outcome, "rating submitted");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::MockBackend;

    fn stars(v: f32) -> Stars {
        Stars::new(v).unwrap()
    }

    #[test]
    fn test_stars_bounds() {
        assert!(Stars::new(1.0).is_some());
        assert!(Stars::new(4.5).is_some());
        assert!(Stars::new(5.0).is_some());
        assert!(Stars::new(0.5).is_none());
        assert!(Stars::new(5.5).is_none());
        assert!(Stars::new(3.3).is_none());
        assert!(Stars::new(f32::NAN).is_none());
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify_rating_error("userId is required"),
            RatingErrorKind::MissingId
        );
        assert_eq!(
            classify_rating_error("Invalid movieId"),
            RatingErrorKind::MissingId
        );
        assert_eq!(
            classify_rating_error("Rating must be between 1 and 5"),
            RatingErrorKind::InvalidRating
        );
        assert_eq!(
            classify_rating_error("Failed to rate movie"),
            RatingErrorKind::Validation
        );
    }

    #[tokio::test]
    async fn test_duplicate_sends_nothing() {
        let backend = MockBackend::new();
        let mut control = RatingControl::new(Some(stars(4.0)));

        let outcome = control.submit(&backend, "m1", Some("u1"), stars(4.0)).await;
        assert_eq!(outcome, RatingOutcome::Duplicate(stars(4.0)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_success_updates_aggregate() {
        let backend = MockBackend::new().ok(
            "rate",
            json!({ "success": true, "rating": 4.6, "ratingCount": 11 }),
        );
        let mut control = RatingControl::default();

        let outcome = control.submit(&backend, "m1", Some("u1"), stars(4.5)).await;
        assert_eq!(
            outcome,
            RatingOutcome::Rated {
                value: stars(4.5),
                average: Some(4.6),
                count: Some(11),
            }
        );
        assert_eq!(control.current(), Some(stars(4.5)));
        assert!(!control.is_pending());
        assert_eq!(backend.calls_to("rate"), vec!["m1 4.5 u1"]);
    }

    #[tokio::test]
    async fn test_failure_restores_previous() {
        let backend = MockBackend::new().fail("rate", 400);
        let mut control = RatingControl::new(Some(stars(2.0)));

        let outcome = control.submit(&backend, "m1", None, stars(3.0)).await;
        assert!(matches!(
            outcome,
            RatingOutcome::Failed {
                unauthorized: false,
                ..
            }
        ));
        assert_eq!(control.current(), Some(stars(2.0)));
    }

    #[tokio::test]
    async fn test_unsuccessful_ack_is_classified() {
        let backend = MockBackend::new().ok(
            "rate",
            json!({ "success": false, "message": "userId is required" }),
        );
        let mut control = RatingControl::default();

        let outcome = control.submit(&backend, "m1", None, stars(5.0)).await;
        assert_eq!(
            outcome,
            RatingOutcome::Failed {
                kind: RatingErrorKind::MissingId,
                message: "userId is required".into(),
                unauthorized: false,
            }
        );
        assert_eq!(control.current(), None);
    }
}
