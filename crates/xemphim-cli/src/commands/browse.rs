use xemphim_core::pages::{image_url, Detail, Home};
use xemphim_core::route::DetailQuery;
use xemphim_core::widgets::format_time;

use super::{confirm, Svc};
use crate::error::CliError;
use crate::render;

pub async fn home(svc: &Svc) -> Result<(), CliError> {
    let mut page = Home::new();
    render::action(page.load(svc).await);

    if let Some(error) = &page.error {
        println!("! {error}");
    }
    match &page.username {
        Some(name) if page.logged_in => println!("Welcome back, {name}"),
        _ => println!("Browsing as guest"),
    }

    render::heading("Featured");
    for hero in &page.hero {
        println!("{} [{}]", hero.title, hero.category);
        println!("  {}", hero.description);
    }

    render::heading(&format!("Films{}", render::origin_note(&page.films)));
    for film in &page.films.data {
        let own = page.user_rating(&film.id).map(|s| s.value());
        println!(
            "{}",
            render::film_line(film, page.favorites.contains(&film.id), own)
        );
    }

    render::heading(&format!("Top views{}", render::origin_note(&page.top)));
    for (rank, film) in page.top.data.iter().enumerate() {
        println!(
            "{:>2}. {} - {} views",
            rank + 1,
            film.name,
            film.views.unwrap_or(0)
        );
    }
    Ok(())
}

/// Open the detail page for `id`, printing whatever opening produced.
async fn open(svc: &Svc, id: &str) -> Detail {
    let (page, action) = Detail::open(svc, DetailQuery::film(id)).await;
    render::action(action);
    if let Some(error) = &page.error {
        println!("! {error}");
    }
    page
}

pub async fn show(svc: &Svc, id: &str) -> Result<(), CliError> {
    let page = open(svc, id).await;
    let Some(loaded) = &page.film else {
        return Ok(());
    };
    let film = &loaded.data;

    println!("{}{}", film.name, render::origin_note(loaded));
    println!(
        "{}",
        render::film_line(film, page.is_favorite(), page.rating.current().map(|s| s.value()))
    );
    println!("  image: {}", image_url(&film.image));
    for (label, value) in [
        ("studio", &film.studio),
        ("status", &film.status),
        ("duration", &film.duration),
    ] {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    if let Some(description) = &film.description {
        println!();
        println!("{description}");
    }

    render::heading(&format!(
        "Episodes ({}){}",
        page.episodes.data.len(),
        render::origin_note(&page.episodes)
    ));
    let current = page.player.current().map(|e| e.id.clone());
    for episode in &page.episodes.data {
        println!(
            "{}",
            render::episode_line(episode, current.as_deref() == Some(episode.id.as_str()))
        );
    }
    if page.player.is_playing() {
        println!(
            "Playing from {}",
            format_time(page.player.pending_seek().unwrap_or(page.player.position()))
        );
    }

    render::heading(&format!("Related{}", render::origin_note(&page.related)));
    for related in &page.related.data {
        let rating = related.rating.map(|r| format!("  ★ {r:.1}")).unwrap_or_default();
        println!("  {}{rating}  id: {}", related.name, related.id);
    }

    render::heading(&format!("Reviews{}", render::origin_note(&page.reviews)));
    for review in &page.reviews.data {
        println!("{} ★ {} ({})", review.username, review.rating, review.date);
        println!("  {}", review.comment);
    }
    Ok(())
}

pub async fn favorite(svc: &Svc, id: &str, yes: bool) -> Result<(), CliError> {
    let mut page = open(svc, id).await;
    let action = page.toggle_favorite(svc).await;

    let Some((_, film_name)) = render::confirm_prompt(&action) else {
        render::action(action);
        return Ok(());
    };
    if yes || confirm(&format!("Remove \"{film_name}\" from favorites?"))? {
        render::action(page.confirm_remove_favorite(svc).await);
    } else {
        println!("Kept.");
    }
    Ok(())
}

pub async fn rate(svc: &Svc, id: &str, value: f32) -> Result<(), CliError> {
    let mut page = open(svc, id).await;
    render::action(page.rate(svc, value).await);
    if let Some(film) = page.film() {
        if let (Some(avg), Some(count)) = (film.rating, film.rating_count) {
            println!("{} is now rated {avg:.1} from {count} ratings.", film.name);
        }
    }
    Ok(())
}
