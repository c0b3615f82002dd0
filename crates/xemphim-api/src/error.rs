use thiserror::Error;

/// Errors from the storefront API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid base URL: {0}")]
    Url(String),
}

impl ApiError {
    /// Build an API error from a non-2xx status and its raw body.
    ///
    /// Prefers the JSON body's `message` field, then the raw text, then a
    /// generic line mentioning the status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let from_json = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));

        let message = match from_json {
            Some(msg) if !msg.is_empty() => msg,
            _ if !body.trim().is_empty() && !body.trim_start().starts_with('{') => {
                body.trim().to_string()
            }
            _ => format!("request failed with status {status}"),
        };

        Self::Api { status, message }
    }

    /// HTTP status of the response, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for a 401 answer (missing or expired token).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The message a page should show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(_) => "Unable to reach the server".into(),
            Self::Parse(_) => "Unexpected response from the server".into(),
            Self::Url(e) => e.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field_wins() {
        let err = ApiError::from_response(400, r#"{"message":"Rating must be 1-5"}"#);
        assert_eq!(err.user_message(), "Rating must be 1-5");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_plain_text_body() {
        let err = ApiError::from_response(502, "Bad Gateway");
        assert_eq!(err.user_message(), "Bad Gateway");
    }

    #[test]
    fn test_generic_fallback() {
        let err = ApiError::from_response(500, "");
        assert_eq!(err.user_message(), "request failed with status 500");

        let err = ApiError::from_response(500, r#"{"error":"boom"}"#);
        assert_eq!(err.user_message(), "request failed with status 500");
    }

    #[test]
    fn test_unauthorized() {
        assert!(ApiError::from_response(401, "").is_unauthorized());
        assert!(!ApiError::from_response(403, "").is_unauthorized());
        assert!(!ApiError::Parse("x".into()).is_unauthorized());
    }
}
