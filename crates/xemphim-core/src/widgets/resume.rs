use xemphim_api::types::WatchHistoryEntry;

/// Where to pick playback back up: handed from the profile page to the
/// detail page through the session store.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeMarker {
    pub episode_id: String,
    pub offset_secs: f64,
}

impl ResumeMarker {
    /// Marker for a history entry; `None` when the entry names no episode.
    pub fn from_history(entry: &WatchHistoryEntry) -> Option<Self> {
        let episode_id = entry.episode_id.clone()?;
        Some(Self {
            episode_id,
            offset_secs: entry.resume_offset(),
        })
    }
}
