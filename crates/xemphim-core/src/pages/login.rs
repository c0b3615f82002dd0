use xemphim_api::types::LoginRequest;
use xemphim_api::{ApiError, Backend};

use crate::notice::Notice;
use crate::pages::{Action, Services};
use crate::route::Route;
use crate::session::SessionUser;

const USERNAME_REQUIRED: &str = "Username is required!";
const PASSWORD_REQUIRED: &str = "Password is required!";
const BAD_CREDENTIALS: &str = "Username or password is incorrect!";

/// Login form.
#[derive(Debug, Default, Clone)]
pub struct Login {
    pub username: String,
    pub password: String,
    pub username_error: Option<String>,
    pub password_error: Option<String>,
    pub submitting: bool,
}

impl Login {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Field checks run before any request; the first failing field wins.
    fn validate(&mut self) -> bool {
        self.username_error = None;
        self.password_error = None;
        if self.username.trim().is_empty() {
            self.username_error = Some(USERNAME_REQUIRED.into());
            return false;
        }
        if self.password.is_empty() {
            self.password_error = Some(PASSWORD_REQUIRED.into());
            return false;
        }
        true
    }

    pub async fn submit<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        if !self.validate() {
            return Action::None;
        }
        self.submitting = true;
        let request = LoginRequest {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        };
        let result = svc.backend.login(&request).await;
        self.submitting = false;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => return Action::Notify(login_failed(&e)),
        };
        let Some(token) = resp.token.filter(|t| !t.is_empty()) else {
            return Action::Notify(Notice::error(
                "Login Failed",
                resp.message.unwrap_or_else(|| BAD_CREDENTIALS.into()),
            ));
        };

        let user = SessionUser {
            id: resp.user_id.unwrap_or_default(),
            username: resp.username.unwrap_or_else(|| request.username.clone()),
        };
        let landing = svc.session.login(&token, &user);
        self.password.clear();

        // Older backends leave the id out of the login answer.
        if user.id.is_empty() {
            match svc.backend.profile().await {
                Ok(profile) => svc.session.remember_user(&SessionUser {
                    id: profile.id,
                    username: profile.username,
                }),
                Err(e) => tracing::debug!("Could not learn user id after login: {e}"),
            }
        }

        let route = resp
            .redirect_url
            .filter(|u| !u.is_empty())
            .map(|u| Route::parse(&u))
            .unwrap_or(landing);
        Action::Navigate(route)
    }
}

fn login_failed(e: &ApiError) -> Notice {
    match e {
        ApiError::Api { status, .. } if (400..500).contains(status) => {
            Notice::error("Login Failed", e.user_message())
        }
        _ => Notice::error("Login Failed", "Something went wrong. Please try again."),
    }
}
