use xemphim_api::types::RegisterRequest;
use xemphim_api::Backend;

use crate::notice::Notice;
use crate::pages::{Action, Services};
use crate::route::Route;

/// A form field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

/// Registration form.
#[derive(Debug, Default, Clone)]
pub struct Register {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub errors: Vec<(Field, String)>,
    pub submitting: bool,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(&mut self) -> Option<Action> {
        self.errors.clear();
        let required = [
            (Field::Username, self.username.trim()),
            (Field::Email, self.email.trim()),
            (Field::Password, self.password.as_str()),
            (Field::ConfirmPassword, self.confirm_password.as_str()),
        ];
        let missing: Vec<(Field, String)> = required
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| (*field, "This field is required".to_string()))
            .collect();
        if !missing.is_empty() {
            self.errors = missing;
            return Some(Action::Notify(Notice::warning(
                "Missing Information",
                "Please fill in all fields.",
            )));
        }
        if !self.email.contains('@') {
            self.errors
                .push((Field::Email, "Please enter a valid email".into()));
            return Some(Action::None);
        }
        if self.password != self.confirm_password {
            self.errors
                .push((Field::ConfirmPassword, "Passwords do not match".into()));
            return Some(Action::None);
        }
        None
    }

    pub async fn submit<B: Backend>(&mut self, svc: &Services<B>) -> Action {
        if let Some(action) = self.validate() {
            return action;
        }
        self.submitting = true;
        let request = RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        let result = svc.backend.register(&request).await;
        self.submitting = false;

        match result {
            Ok(resp) if resp.id.as_deref().is_some_and(|id| !id.is_empty()) => {
                tracing::info!(username = %request.username, "account registered");
                *self = Self::default();
                Action::Notify(Notice::success(
                    "Registration successful",
                    "Your account was created. Please log in.",
                ))
                .then(Action::Navigate(Route::Login))
            }
            Ok(resp) => Action::Notify(Notice::error(
                "Registration failed",
                resp.message
                    .unwrap_or_else(|| "Registration failed. Please try again.".into()),
            )),
            Err(e) => {
                tracing::warn!("Registration failed: {e}");
                Action::Notify(Notice::error("Registration failed", e.user_message()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::pages::fixtures::services;
    use crate::testing::MockBackend;

    fn filled() -> Register {
        Register {
            username: "carol".into(),
            email: "carol@x.io".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
            ..Register::default()
        }
    }

    #[tokio::test]
    async fn test_blank_fields_warn() {
        let svc = services(MockBackend::new());
        let mut form = Register {
            username: "carol".into(),
            ..Register::default()
        };
        let action = form.submit(&svc).await;
        assert!(matches!(action, Action::Notify(ref n) if n.message == "Please fill in all fields."));
        assert_eq!(form.errors.len(), 3);
        assert!(svc.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_password_mismatch() {
        let svc = services(MockBackend::new());
        let mut form = Register {
            confirm_password: "other".into(),
            ..filled()
        };
        assert_eq!(form.submit(&svc).await, Action::None);
        assert_eq!(form.errors[0].0, Field::ConfirmPassword);
        assert!(svc.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_success_requires_id() {
        let svc = services(MockBackend::new().ok("register", json!({ "_id": "u5" })));
        let mut form = filled();
        let action = form.submit(&svc).await;
        assert!(action.into_vec().contains(&Action::Navigate(Route::Login)));
        assert_eq!(svc.backend.calls_to("register"), vec!["carol carol@x.io"]);
        assert!(form.password.is_empty());
    }

    #[tokio::test]
    async fn test_answer_without_id_is_failure() {
        let svc = services(
            MockBackend::new().ok("register", json!({ "message": "Username already exists" })),
        );
        let mut form = filled();
        let action = form.submit(&svc).await;
        assert_eq!(
            action,
            Action::Notify(Notice::error("Registration failed", "Username already exists"))
        );
    }
}
