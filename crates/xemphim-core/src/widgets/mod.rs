//! Interaction state machines shared by the pages.

pub mod favorite;
pub mod player;
pub mod progress;
pub mod rating;
pub mod resume;

pub use favorite::{FavoriteIntent, FavoriteSet};
pub use player::{format_time, Player};
pub use progress::{ProgressReport, ProgressTracker};
pub use rating::{classify_rating_error, RatingControl, RatingErrorKind, RatingOutcome, Stars};
pub use resume::ResumeMarker;
