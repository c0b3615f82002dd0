use xemphim_api::types::ProfileUpdate;
use xemphim_core::pages::Profile;
use xemphim_core::route::Route;

use super::{confirm, Svc};
use crate::error::CliError;
use crate::render;

/// Open the profile page; `None` when the guard sent us to login.
pub(super) async fn open(svc: &Svc) -> Option<Profile> {
    let (page, action) = Profile::open(svc).await;
    if render::action(action) == Some(Route::Login) {
        println!("Sign in first: xemphim login <username>");
        return None;
    }
    if let Some(error) = &page.error {
        println!("! {error}");
    }
    Some(page)
}

pub async fn show(
    svc: &Svc,
    favorite: Option<String>,
    unfavorite: Option<String>,
    yes: bool,
) -> Result<(), CliError> {
    let Some(mut page) = open(svc).await else {
        return Ok(());
    };

    if let Some(id) = favorite {
        render::action(page.add_favorite(svc, &id).await);
    }
    if let Some(id) = unfavorite {
        let action = page.request_remove_favorite(&id);
        match render::confirm_prompt(&action) {
            Some((film_id, film_name)) => {
                if yes || confirm(&format!("Remove \"{film_name}\" from favorites?"))? {
                    render::action(page.confirm_remove_favorite(svc, &film_id).await);
                }
            }
            None => {
                render::action(action);
            }
        }
    }

    if let Some(user) = &page.user {
        render::profile_header(&user.data);
        if !user.is_live() {
            println!("  {}", render::origin_note(user).trim());
        }
    }

    render::heading(&format!(
        "Favorites ({}){}",
        page.favorites.data.len(),
        render::origin_note(&page.favorites)
    ));
    for film in &page.favorites.data {
        println!("{}", render::film_line(film, true, None));
    }

    render::heading(&format!("Watch history{}", render::origin_note(&page.history)));
    for (index, entry) in page.history.data.iter().enumerate() {
        println!("{}", render::history_line(index, entry));
    }
    if !page.history.data.is_empty() {
        println!("Continue with: xemphim resume <index>");
    }

    render::heading(&format!("Ratings{}", render::origin_note(&page.ratings)));
    for rating in &page.ratings.data {
        let name = rating.movie_name.as_deref().unwrap_or(&rating.movie_id);
        println!("  {name} ★ {}", rating.rating);
    }
    Ok(())
}

pub async fn edit(
    svc: &Svc,
    username: Option<String>,
    email: Option<String>,
    bio: Option<String>,
    account: bool,
) -> Result<(), CliError> {
    let update = ProfileUpdate {
        username,
        email,
        bio,
    };
    if update == ProfileUpdate::default() {
        println!("Nothing to change; pass --username, --email or --bio.");
        return Ok(());
    }

    let mut page = Profile::default();
    let action = if account {
        page.edit_account(svc, update).await
    } else {
        page.edit_profile(svc, update).await
    };
    if render::action(action) == Some(Route::Login) {
        println!("Sign in again: xemphim login <username>");
    }
    Ok(())
}
