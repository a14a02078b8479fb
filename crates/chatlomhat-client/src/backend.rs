//! HTTP client for the external math backend.
//!
//! Endpoints:
//!   GET  /health             : connectivity probe, `{ "status": "healthy" }`
//!   POST /solve              : multipart `prompt` / `image`, `{ "solution": … }`
//!   POST /generate-exercises : JSON `{ topic, difficulty, numProblems }`
//!
//! Every URL comes from the single resolved [`BackendConfig`]; nothing in the
//! UI or the proxy layer builds backend addresses on its own.

use async_trait::async_trait;
use chatlomhat_common::config::BackendConfig;
use chatlomhat_common::models::{
    ExerciseRequest, ExerciseResponse, HealthResponse, SolveRequest, SolveResponse,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

use crate::error::{ClientError, Result};

// ── Trait ─────────────────────────────────────────────────────────────────────

/// The two backend operations the forms depend on.
#[async_trait]
pub trait MathApi: Send + Sync {
    async fn solve(&self, req: SolveRequest) -> Result<SolveResponse>;
    async fn generate_exercises(&self, req: &ExerciseRequest) -> Result<ExerciseResponse>;
}

/// A backend response captured verbatim for relaying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

// ── Client ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BackendClient {
    config: BackendConfig,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    /// Client whose every request, health probe included, gives up after `timeout`.
    pub fn with_timeout(config: BackendConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Probe `/health`. Every failure mode collapses to `false`.
    pub async fn check_health(&self) -> bool {
        let url = self.config.endpoint("/health");
        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("API health check failed: {}", e);
                return false;
            }
        };

        let status = resp.status();
        match resp.json::<HealthResponse>().await {
            Ok(body) => {
                tracing::debug!(status = status.as_u16(), marker = %body.status, "API health check");
                status.is_success() && body.is_healthy()
            }
            Err(e) => {
                tracing::warn!(status = status.as_u16(), "API health check returned an unreadable body: {}", e);
                false
            }
        }
    }

    /// POST `body` to a backend path unchanged and capture the reply.
    pub async fn forward(
        &self,
        path: &str,
        content_type: Option<&str>,
        body: impl Into<reqwest::Body>,
    ) -> Result<RelayedResponse> {
        let url = self.config.endpoint(path);
        tracing::debug!("Forwarding request to {}", url);

        let mut req = self.client.post(&url).body(body);
        if let Some(content_type) = content_type {
            req = req.header(CONTENT_TYPE, content_type);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await?.to_vec();

        Ok(RelayedResponse { status, content_type, body })
    }
}

fn solve_form(req: SolveRequest) -> Result<Form> {
    let mut form = Form::new();
    if let Some(image) = req.image {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime_type)?;
        form = form.part("image", part);
    }
    if let Some(prompt) = req.prompt {
        form = form.text("prompt", prompt);
    }
    Ok(form)
}

#[async_trait]
impl MathApi for BackendClient {
    async fn solve(&self, req: SolveRequest) -> Result<SolveResponse> {
        let url = self.config.endpoint("/solve");
        let resp = self.client.post(&url).multipart(solve_form(req)?).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status { status: status.as_u16() });
        }
        Ok(resp.json::<SolveResponse>().await?)
    }

    async fn generate_exercises(&self, req: &ExerciseRequest) -> Result<ExerciseResponse> {
        let url = self.config.endpoint("/generate-exercises");
        let resp = self.client.post(&url).json(req).send().await?;

        // Failures usually still carry `{ success: false, error }`, so the
        // body is decoded regardless of status.
        let status = resp.status();
        let bytes = resp.bytes().await?;
        match serde_json::from_slice::<ExerciseResponse>(&bytes) {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(ClientError::Status { status: status.as_u16() }),
            Err(e) => Err(e.into()),
        }
    }
}
