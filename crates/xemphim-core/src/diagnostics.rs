use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

/// Maximum number of events retained in the ring buffer.
const EVENT_LOG_CAPACITY: usize = 200;

/// Something the user never sees directly but a support session might need.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// A read failed and built-in demo content was shown instead.
    FallbackServed { resource: &'static str, reason: String },
    /// A read failed and the view was left empty.
    ReadFailed { resource: &'static str, reason: String },
    /// A background write (view count, history, progress) failed.
    WriteFailed { action: &'static str, reason: String },
    /// A 401 ended the session.
    ForcedLogout { endpoint: &'static str },
    /// The stored token failed verification.
    TokenRejected,
    ProgressReported {
        film_id: String,
        percent: u8,
        watched: bool,
    },
}

/// A timestamped event entry.
pub type EventEntry = (DateTime<Utc>, DiagnosticEvent);

/// Bounded ring buffer of diagnostic events.
#[derive(Debug)]
pub struct EventLog {
    entries: VecDeque<EventEntry>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
        }
    }

    /// Push a new event, evicting the oldest if at capacity.
    pub fn push(&mut self, event: DiagnosticEvent) {
        if self.entries.len() >= EVENT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back((Utc::now(), event));
    }

    /// Return a snapshot of all entries (newest last).
    pub fn snapshot(&self) -> Vec<EventEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Thread-safe handle to the event log.
pub type SharedEventLog = Arc<Mutex<EventLog>>;

/// Create a new shared event log.
pub fn shared_event_log() -> SharedEventLog {
    Arc::new(Mutex::new(EventLog::new()))
}

/// Append to a shared log; a poisoned lock drops the event.
pub fn record(log: &SharedEventLog, event: DiagnosticEvent) {
    if let Ok(mut log) = log.lock() {
        log.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_evicts_oldest() {
        let mut log = EventLog::new();
        for i in 0..(EVENT_LOG_CAPACITY + 5) {
            log.push(DiagnosticEvent::ProgressReported {
                film_id: i.to_string(),
                percent: 10,
                watched: false,
            });
        }
        let entries = log.snapshot();
        assert_eq!(entries.len(), EVENT_LOG_CAPACITY);
        assert_eq!(
            entries[0].1,
            DiagnosticEvent::ProgressReported {
                film_id: "5".into(),
                percent: 10,
                watched: false,
            }
        );
    }

    #[test]
    fn test_shared_record() {
        let log = shared_event_log();
        record(&log, DiagnosticEvent::TokenRejected);
        assert_eq!(log.lock().unwrap().len(), 1);
    }
}
