/// A progress checkpoint worth sending to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    pub percent: u8,
    pub watched: bool,
    /// First report at or past the watched threshold for this episode.
    pub newly_watched: bool,
}

/// Turns a stream of playback time updates into sparse progress reports.
///
/// Reports fire on every multiple of `step` and on every percent at or
/// above `threshold`, never twice for the same percent.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    step: u8,
    threshold: u8,
    last_reported: Option<u8>,
    watched: bool,
}

impl ProgressTracker {
    pub fn new(step: u8, threshold: u8) -> Self {
        Self {
            step: step.max(1),
            threshold: threshold.min(100),
            last_reported: None,
            watched: false,
        }
    }

    /// Forget everything; call when a different episode starts.
    pub fn reset(&mut self) {
        self.last_reported = None;
        self.watched = false;
    }

    pub fn is_watched(&self) -> bool {
        self.watched
    }

    /// Feed a player time update. Zero, negative or non-finite values are
    /// ignored; a position that rounds to 0% is still a checkpoint.
    pub fn observe(&mut self, current_secs: f64, duration_secs: f64) -> Option<ProgressReport> {
        if !current_secs.is_finite() || !duration_secs.is_finite() {
            return None;
        }
        if current_secs <= 0.0 || duration_secs <= 0.0 {
            return None;
        }
        let percent = (current_secs / duration_secs * 100.0).round().min(100.0) as u8;
        self.observe_percent(percent)
    }

    pub fn observe_percent(&mut self, percent: u8) -> Option<ProgressReport> {
        let percent = percent.min(100);
        if percent % self.step != 0 && percent < self.threshold {
            return None;
        }
        if self.last_reported == Some(percent) {
            return None;
        }
        self.last_reported = Some(percent);

        let watched = percent >= self.threshold;
        let newly_watched = watched && !self.watched;
        self.watched |= watched;
        Some(ProgressReport {
            percent,
            watched,
            newly_watched,
        })
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(10, 90)
    }
}
