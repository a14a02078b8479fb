//! Pass-through routes to the backend.
//!
//! The browser only ever sees these paths; the backend address stays server
//! side. Bodies are relayed without inspection, and any failure to reach the
//! backend becomes a 500 with the fixed error envelope.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chatlomhat_common::models::ErrorEnvelope;

use crate::state::{AppState, SharedState};

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// POST /solve: multipart body forwarded byte-for-byte, boundary included.
pub async fn solve_proxy(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    relay(&state, "/solve", content_type, body).await
}

/// POST /generate-exercises: JSON decoded, re-serialized and forwarded.
pub async fn generate_exercises_proxy(
    State(state): State<SharedState>,
    body: Bytes,
) -> Response {
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Error proxying /generate-exercises: invalid JSON body: {}", e);
            return backend_error();
        }
    };
    let body = match serde_json::to_vec(&payload) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Error proxying /generate-exercises: {}", e);
            return backend_error();
        }
    };
    relay(&state, "/generate-exercises", Some(DEFAULT_CONTENT_TYPE), Bytes::from(body)).await
}

async fn relay(state: &AppState, path: &str, content_type: Option<&str>, body: Bytes) -> Response {
    match state.backend.forward(path, content_type, body).await {
        Ok(relayed) => {
            let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let content_type = relayed
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            tracing::debug!(status = relayed.status, "Relayed {}", path);
            (status, [(header::CONTENT_TYPE, content_type)], relayed.body).into_response()
        }
        Err(e) => {
            tracing::error!("Error proxying {}: {}", path, e);
            backend_error()
        }
    }
}

fn backend_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorEnvelope::backend_unreachable())).into_response()
}
