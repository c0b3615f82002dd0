use xemphim_api::types::Episode;

/// Format seconds as `M:SS`; unusable input renders as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Playback state for the detail page's embedded player.
///
/// A seek requested before the media is ready is queued and handed back
/// from [`Player::on_ready`].
#[derive(Debug, Clone, Default)]
pub struct Player {
    episode: Option<Episode>,
    playing: bool,
    position: f64,
    duration: f64,
    pending_seek: Option<f64>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an episode without starting it.
    pub fn select(&mut self, episode: Episode) {
        self.episode = Some(episode);
        self.playing = false;
        self.position = 0.0;
        self.duration = 0.0;
        self.pending_seek = None;
    }

    pub fn play(&mut self, episode: Episode) {
        self.select(episode);
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn queue_seek(&mut self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.pending_seek = Some(secs);
        }
    }

    /// Media became ready; returns the queued seek, once.
    pub fn on_ready(&mut self) -> Option<f64> {
        let seek = self.pending_seek.take()?;
        self.position = seek;
        Some(seek)
    }

    pub fn on_time_update(&mut self, position: f64, duration: f64) {
        if position.is_finite() && position >= 0.0 {
            self.position = position;
        }
        if duration.is_finite() && duration > 0.0 {
            self.duration = duration;
        }
    }

    pub fn current(&self) -> Option<&Episode> {
        self.episode.as_ref()
    }

    /// Mutable access for local state such as the watched flag.
    pub fn current_mut(&mut self) -> Option<&mut Episode> {
        self.episode.as_mut()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn pending_seek(&self) -> Option<f64> {
        self.pending_seek
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ep(n: u32) -> Episode {
        Episode {
            id: format!("ep-{n}"),
            number: n,
            ..Episode::default()
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.9), "0:05");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(1455.0), "24:15");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn test_seek_waits_for_ready() {
        let mut player = Player::new();
        player.play(ep(3));
        player.queue_seek(120.0);
        assert_eq!(player.position(), 0.0);
        assert_eq!(player.on_ready(), Some(120.0));
        assert_eq!(player.position(), 120.0);
        assert_eq!(player.on_ready(), None);
    }

    #[test]
    fn test_switching_episode_drops_pending_seek() {
        let mut player = Player::new();
        player.play(ep(1));
        player.queue_seek(30.0);
        player.play(ep(2));
        assert_eq!(player.on_ready(), None);
        assert_eq!(player.current().map(|e| e.number), Some(2));
        assert!(player.is_playing());
    }
}
