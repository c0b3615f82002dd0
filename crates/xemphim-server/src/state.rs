use std::sync::Arc;
use std::time::Duration;

use xemphim_core::config::ServerConfig;

use crate::error::ServerError;
use crate::gate::PathPattern;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub jwt_secret: String,
    pub backend_url: String,
    pub protected: Arc<Vec<PathPattern>>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let protected = config
            .protected
            .iter()
            .map(|p| PathPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            jwt_secret: config.jwt_secret.clone(),
            backend_url: config.backend_url.trim_end_matches('/').to_string(),
            protected: Arc::new(protected),
            http,
        })
    }
}
