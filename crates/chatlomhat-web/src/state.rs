//! Shared application state for the web server.

use std::sync::Arc;

use chatlomhat_client::{BackendClient, ClientError};
use chatlomhat_common::AppConfig;
use chrono::Duration;

use crate::session::SessionStore;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: AppConfig,
    /// The only route to the backend; proxies and UI both go through it.
    pub backend: BackendClient,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ClientError> {
        let backend = BackendClient::with_timeout(
            config.backend_config(),
            config.backend.request_timeout(),
        )?;
        let sessions = SessionStore::new(Duration::hours(1), config.server.max_sessions);
        Ok(Self { config, backend, sessions })
    }
}

pub type SharedState = Arc<AppState>;
