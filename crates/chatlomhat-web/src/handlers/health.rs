//! Backend connectivity as JSON.

use axum::{extract::State, Json};
use chatlomhat_client::ConnectivityStatus;
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: ConnectivityStatus,
    pub api_url: String,
    pub environment: String,
}

/// GET /api/health: probes the backend once per call.
pub async fn api_health(State(state): State<SharedState>) -> Json<HealthReport> {
    let status = ConnectivityStatus::probe(&state.backend).await;
    let backend = state.backend.config();
    Json(HealthReport {
        status,
        api_url: backend.api_url.clone(),
        environment: backend.environment.to_string(),
    })
}
