use xemphim_core::pages::Detail;
use xemphim_core::route::{DetailQuery, Route};
use xemphim_core::widgets::format_time;

use super::{profile, Svc};
use crate::error::CliError;
use crate::render;

/// Playback clock granularity for simulated playback.
const TICK_SECS: f64 = 5.0;

/// `"24:15"` or `"1:30:00"` as seconds.
pub fn parse_clock(text: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut parts = 0;
    for part in text.trim().split(':') {
        let value: u32 = part.parse().ok()?;
        total = total * 60.0 + f64::from(value);
        parts += 1;
    }
    (parts > 1 || total > 0.0).then_some(total)
}

pub async fn watch(
    svc: &Svc,
    id: &str,
    episode: Option<u32>,
    from: u32,
    seconds: u32,
    next: bool,
) -> Result<(), CliError> {
    let (mut page, action) = Detail::open(svc, DetailQuery::film(id)).await;
    render::action(action);
    if let Some(error) = &page.error {
        println!("! {error}");
        if page.film.is_none() {
            return Ok(());
        }
    }

    let action = match episode {
        Some(number) => {
            let Some(target) = page
                .episodes
                .data
                .iter()
                .find(|e| e.number == number)
                .map(|e| e.id.clone())
            else {
                println!("No episode {number}.");
                return Ok(());
            };
            page.play_episode(svc, &target).await
        }
        None => page.watch_now(svc).await,
    };
    render::action(action);
    if from > 0 {
        page.player.queue_seek(f64::from(from));
    }
    play(svc, &mut page, seconds).await;

    if next {
        let before = page.player.current().map(|e| e.id.clone());
        render::action(page.next_episode(svc).await);
        if page.player.current().map(|e| e.id.clone()) != before {
            play(svc, &mut page, seconds).await;
        }
    }
    Ok(())
}

pub async fn resume(svc: &Svc, index: usize, seconds: u32) -> Result<(), CliError> {
    let Some(profile) = profile::open(svc).await else {
        return Ok(());
    };
    let Some(Route::Detail(query)) = render::action(profile.resume(svc, index)) else {
        println!("No history entry {index}; see `xemphim profile`.");
        return Ok(());
    };

    let (mut page, action) = Detail::open(svc, query).await;
    render::action(action);
    if !page.player.is_playing() {
        render::action(page.watch_now(svc).await);
    }
    play(svc, &mut page, seconds).await;
    Ok(())
}

/// Feed the player `seconds` of time updates, starting at any queued seek.
async fn play(svc: &Svc, page: &mut Detail, seconds: u32) {
    let Some(episode) = page.player.current().cloned() else {
        println!("Nothing to play.");
        return;
    };
    let duration = parse_clock(&episode.duration).unwrap_or(0.0);
    let start = page.on_player_ready().unwrap_or(0.0).clamp(0.0, duration);
    let end = (start + f64::from(seconds)).min(duration);

    println!(
        "▶ {} - episode {}: {} from {}",
        page.film().map(|f| f.name.as_str()).unwrap_or("?"),
        episode.number,
        episode.title,
        format_time(start)
    );

    let mut position = start;
    loop {
        render::action(page.on_time_update(svc, position, duration).await);
        if position >= end {
            break;
        }
        position = (position + TICK_SECS).min(end);
    }

    page.player.stop();
    let watched = page.player.current().is_some_and(|e| e.watched);
    println!(
        "■ stopped at {} / {}{}",
        format_time(page.player.position()),
        format_time(duration),
        if watched { " (watched)" } else { "" }
    );
}
