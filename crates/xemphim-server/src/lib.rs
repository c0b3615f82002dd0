//! Request gate and rating proxy for the xemphim storefront.

pub mod error;
pub mod gate;
pub mod routes;
pub mod state;

use xemphim_core::config::ServerConfig;

use crate::error::ServerError;
use crate::state::AppState;

/// Bind `config.bind` and serve until the process is stopped.
pub async fn run(config: &ServerConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(config)?;
    for pattern in state.protected.iter() {
        tracing::debug!(pattern = pattern.as_str(), "Protected path");
    }

    let app = routes::build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
