pub mod detail;
pub mod home;
pub mod login;
pub mod profile;
pub mod register;

use std::sync::Arc;

use xemphim_api::{ApiError, Backend};

use crate::config::{AppConfig, UnauthorizedPolicy};
use crate::diagnostics::{record, shared_event_log, DiagnosticEvent, SharedEventLog};
use crate::fallback::DegradedMode;
use crate::notice::{Modal, Notice};
use crate::route::Route;
use crate::session::{SessionStore, SessionUser};

pub use detail::Detail;
pub use home::Home;
pub use login::Login;
pub use profile::Profile;
pub use register::Register;

/// Side effects a page asks the presentation layer to carry out.
///
/// Controllers return these instead of driving navigation or dialogs
/// themselves; the shell interprets them in one place.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No side-effect.
    None,
    Navigate(Route),
    ShowModal(Modal),
    Notify(Notice),
    /// Several effects, in order.
    Many(Vec<Action>),
}

impl Action {
    /// Chain another effect after this one.
    pub fn then(self, next: Action) -> Action {
        match (self, next) {
            (Action::None, next) => next,
            (this, Action::None) => this,
            (Action::Many(mut list), next) => {
                list.push(next);
                Action::Many(list)
            }
            (this, next) => Action::Many(vec![this, next]),
        }
    }

    /// Flatten into a list of single effects.
    pub fn into_vec(self) -> Vec<Action> {
        match self {
            Action::None => Vec::new(),
            Action::Many(list) => list.into_iter().flat_map(Action::into_vec).collect(),
            single => vec![single],
        }
    }
}

/// Which call produced a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScope {
    /// `GET /auth/profile`; always ends the session.
    Profile,
    /// Any other authenticated call.
    Other(&'static str),
}

/// What every page controller needs: the backend, the session, config and
/// the diagnostics log.
pub struct Services<B> {
    pub backend: B,
    pub session: Arc<SessionStore>,
    pub config: AppConfig,
    pub diagnostics: SharedEventLog,
    degraded: DegradedMode,
}

impl<B: Backend> Services<B> {
    pub fn new(backend: B, session: Arc<SessionStore>, config: AppConfig) -> Self {
        let diagnostics = shared_event_log();
        let degraded = DegradedMode::new(config.degraded.enabled, diagnostics.clone());
        Self {
            backend,
            session,
            config,
            diagnostics,
            degraded,
        }
    }

    pub fn degraded(&self) -> &DegradedMode {
        &self.degraded
    }

    pub fn record(&self, event: DiagnosticEvent) {
        record(&self.diagnostics, event);
    }

    /// Apply the 401 policy to a failed authenticated call.
    ///
    /// Returns the forced-logout effects when the session was ended.
    pub fn check_unauthorized(&self, error: &ApiError, scope: AuthScope) -> Option<Action> {
        if !error.is_unauthorized() {
            return None;
        }
        self.on_unauthorized(scope)
    }

    /// A call in `scope` answered 401; end the session if policy says so.
    pub fn on_unauthorized(&self, scope: AuthScope) -> Option<Action> {
        let endpoint = match (scope, self.config.session.unauthorized) {
            (AuthScope::Profile, _) => "auth/profile",
            (AuthScope::Other(name), UnauthorizedPolicy::Everywhere) => name,
            (AuthScope::Other(_), UnauthorizedPolicy::Profile) => return None,
        };
        tracing::warn!(endpoint, "401 from backend, ending session");
        self.session.clear();
        self.record(DiagnosticEvent::ForcedLogout { endpoint });
        Some(
            Action::Notify(Notice::error(
                "Session expired",
                "Your session has expired. Please log in again.",
            ))
            .then(Action::Navigate(Route::Login)),
        )
    }

    /// Log a failed background write and apply the 401 policy.
    pub fn write_failed(&self, action: &'static str, error: &ApiError) -> Action {
        tracing::warn!(action, "Background write failed: {error}");
        self.record(DiagnosticEvent::WriteFailed {
            action,
            reason: error.to_string(),
        });
        self.check_unauthorized(error, AuthScope::Other(action))
            .unwrap_or(Action::None)
    }

    /// Check the stored token with the backend; a rejected token ends the
    /// session and is recorded.
    pub async fn verify_session(&self) -> Option<SessionUser> {
        if !self.session.is_logged_in() {
            return None;
        }
        let user = self.session.check_auth(&self.backend).await;
        if user.is_none() {
            self.record(DiagnosticEvent::TokenRejected);
        }
        user
    }

    /// The signed-in user's id, when both a token and an id are stored.
    pub fn user_id(&self) -> Option<String> {
        self.session
            .is_logged_in()
            .then(|| self.session.user_id())
            .flatten()
    }
}

/// `http…` images pass through; bare file names live under `/img/anime/`.
pub fn image_url(image: &str) -> String {
    if image.starts_with("http") || image.starts_with('/') {
        image.to_string()
    } else {
        format!("/img/anime/{image}")
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use super::Services;
    use crate::config::AppConfig;
    use crate::session::{SessionStore, SessionUser};
    use crate::testing::MockBackend;

    pub fn services(backend: MockBackend) -> Services<MockBackend> {
        services_with(backend, AppConfig::default())
    }

    pub fn services_with(backend: MockBackend, config: AppConfig) -> Services<MockBackend> {
        Services::new(backend, Arc::new(SessionStore::in_memory()), config)
    }

    pub fn logged_in(backend: MockBackend) -> Services<MockBackend> {
        let svc = services(backend);
        svc.session.login(
            "abc",
            &SessionUser {
                id: "u1".into(),
                username: "alice".into(),
            },
        );
        svc
    }
}
