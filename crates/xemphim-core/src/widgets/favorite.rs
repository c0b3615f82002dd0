use std::collections::HashSet;

use xemphim_api::{ApiError, Backend};

/// What a click on a favorite control should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteIntent {
    /// Anonymous user: show the login prompt, touch nothing.
    LoginRequired,
    /// Not a favorite yet: add immediately.
    Add,
    /// Already a favorite: ask before removing.
    ConfirmRemove,
}

/// The signed-in user's favorite film ids.
///
/// `add` and `remove` take `&mut self`, so one page cannot have two
/// favorite requests in flight.
#[derive(Debug, Clone, Default)]
pub struct FavoriteSet {
    ids: HashSet<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, film_id: &str) -> bool {
        self.ids.contains(film_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn intent(&self, logged_in: bool, film_id: &str) -> FavoriteIntent {
        if !logged_in {
            FavoriteIntent::LoginRequired
        } else if self.contains(film_id) {
            FavoriteIntent::ConfirmRemove
        } else {
            FavoriteIntent::Add
        }
    }

    /// Add on the backend, then locally. Failure leaves the set unchanged.
    pub async fn add<B: Backend>(
        &mut self,
        backend: &B,
        user_id: &str,
        film_id: &str,
    ) -> Result<(), ApiError> {
        backend.add_favorite(user_id, film_id).await?;
        self.ids.insert(film_id.to_string());
        tracing::debug!(film_id, "favorite added");
        Ok(())
    }

    /// Remove on the backend, then locally. Failure leaves the set unchanged.
    pub async fn remove<B: Backend>(&mut self, backend: &B, film_id: &str) -> Result<(), ApiError> {
        backend.remove_favorite(film_id).await?;
        self.ids.remove(film_id);
        tracing::debug!(film_id, "favorite removed");
        Ok(())
    }
}
