//! Session persistence.
//!
//! The session is a handful of string keys in a key-value store: the bearer
//! token, the user id and name, and the resume markers written by the
//! profile page for the detail page to consume. [`SessionStore`] is the only
//! writer of those keys.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use xemphim_api::{Backend, TokenSource};

use crate::error::CoreError;
use crate::route::Route;
use crate::widgets::resume::ResumeMarker;

/// Storage keys shared with the web client.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USERNAME: &str = "username";
    pub const USER_ID: &str = "userId";
    pub const RESUME_EPISODE_ID: &str = "resumeEpisodeId";
    pub const RESUME_TIME: &str = "resumeTime";

    pub const ALL: [&str; 5] = [TOKEN, USERNAME, USER_ID, RESUME_EPISODE_ID, RESUME_TIME];
}

/// Minimal string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// In-process store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.map
            .lock()
            .map_err(|e| CoreError::Storage(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.map
            .lock()
            .map_err(|e| CoreError::Storage(e.to_string()))?
            .remove(key);
        Ok(())
    }
}

/// A JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Missing or unreadable files read as empty.
    fn read_map(&self) -> HashMap<String, String> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "Ignoring corrupt session file: {e}");
            HashMap::new()
        })
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json =
            serde_json::to_string_pretty(map).map_err(|e| CoreError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), CoreError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        let mut map = self.read_map();
        f(&mut map);
        self.write_map(&map)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.update(|map| {
            map.remove(key);
        })
    }
}

/// Who is signed in, as far as the client knows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
}

/// Owner of the persisted session keys.
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
    landing: Route,
}

impl SessionStore {
    pub fn new(store: impl KeyValueStore + 'static, landing: Route) -> Self {
        Self {
            store: Box::new(store),
            landing,
        }
    }

    /// A throwaway session, mostly for tests and one-shot commands.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), Route::Home)
    }

    pub fn token(&self) -> Option<String> {
        self.read(keys::TOKEN)
    }

    pub fn user_id(&self) -> Option<String> {
        self.read(keys::USER_ID)
    }

    pub fn username(&self) -> Option<String> {
        self.read(keys::USERNAME)
    }

    /// Logged in means a token is present; it is not verified here.
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// Persist a fresh login and return where to go next.
    ///
    /// Starts from an empty store so nothing from a previous account
    /// survives next to the new token.
    pub fn login(&self, token: &str, user: &SessionUser) -> Route {
        self.clear();
        self.write(keys::TOKEN, token);
        if !user.id.is_empty() {
            self.write(keys::USER_ID, &user.id);
        }
        if !user.username.is_empty() {
            self.write(keys::USERNAME, &user.username);
        }
        tracing::info!(username = %user.username, "session opened");
        self.landing.clone()
    }

    /// Clear every session key and return the public route.
    pub fn logout(&self) -> Route {
        self.clear();
        tracing::info!("session closed");
        Route::Root
    }

    /// Drop all keys without choosing a route.
    pub fn clear(&self) {
        for key in keys::ALL {
            self.erase(key);
        }
    }

    /// Remember identity fields learned after login (profile fetch, verify).
    pub fn remember_user(&self, user: &SessionUser) {
        if !user.id.is_empty() {
            self.write(keys::USER_ID, &user.id);
        }
        if !user.username.is_empty() {
            self.write(keys::USERNAME, &user.username);
        }
    }

    /// Verify the stored token against the backend.
    ///
    /// On success the returned identity is stored. Any failure, including
    /// an unreachable backend, clears every session key.
    pub async fn check_auth<B: Backend>(&self, backend: &B) -> Option<SessionUser> {
        self.token()?;
        match backend.verify_token().await {
            Ok(profile) => {
                let user = SessionUser {
                    id: profile.id,
                    username: profile.username,
                };
                self.remember_user(&user);
                Some(user)
            }
            Err(e) => {
                tracing::warn!("Stored token rejected: {e}");
                self.clear();
                None
            }
        }
    }

    pub fn set_resume(&self, marker: &ResumeMarker) {
        self.write(keys::RESUME_EPISODE_ID, &marker.episode_id);
        self.write(keys::RESUME_TIME, &marker.offset_secs.to_string());
    }

    /// Store only the episode to resume, keeping any stored offset.
    pub fn set_resume_episode(&self, episode_id: &str) {
        self.write(keys::RESUME_EPISODE_ID, episode_id);
    }

    pub fn resume_episode_id(&self) -> Option<String> {
        self.read(keys::RESUME_EPISODE_ID)
    }

    /// Stored offset; non-numeric or negative values read as absent.
    pub fn resume_time(&self) -> Option<f64> {
        self.read(keys::RESUME_TIME)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite() && *t >= 0.0)
    }

    pub fn clear_resume(&self) {
        self.erase(keys::RESUME_EPISODE_ID);
        self.erase(keys::RESUME_TIME);
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|v| !v.is_empty())
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, "Failed to persist session key: {e}");
        }
    }

    fn erase(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, "Failed to remove session key: {e}");
        }
    }
}

impl TokenSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.is_logged_in())
            .field("landing", &self.landing)
            .finish()
    }
}
