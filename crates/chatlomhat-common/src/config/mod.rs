//! Configuration loading for ChatLomhat.
//! Reads chatlomhat.toml from the current directory or the path in CHATLOMHAT_CONFIG,
//! then applies environment overrides. The file is optional.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::{ChatLomhatError, Result};

/// Public backend used when running in production without an override.
pub const PRODUCTION_API_URL: &str = "https://chatlomhat.onrender.com";
/// Local backend used everywhere else.
pub const LOCAL_API_URL: &str = "http://localhost:5002";

pub const ENV_CONFIG_PATH: &str = "CHATLOMHAT_CONFIG";
pub const ENV_API_URL: &str = "CHATLOMHAT_API_URL";
pub const ENV_RUNTIME: &str = "CHATLOMHAT_ENV";
pub const ENV_BIND: &str = "CHATLOMHAT_BIND";

const DEFAULT_CONFIG_PATH: &str = "chatlomhat.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnv {
    #[default]
    Development,
    Production,
    Test,
}

impl RuntimeEnv {
    /// Lenient parse for environment variables; unknown values mean development.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => RuntimeEnv::Production,
            "test" => RuntimeEnv::Test,
            _ => RuntimeEnv::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeEnv::Development => "development",
            RuntimeEnv::Production => "production",
            RuntimeEnv::Test => "test",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, RuntimeEnv::Production)
    }
}

impl fmt::Display for RuntimeEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the backend base URL. A non-blank override always wins.
pub fn resolve_api_url(override_url: Option<&str>, environment: RuntimeEnv) -> String {
    let explicit = override_url
        .map(str::trim)
        .filter(|url| !url.is_empty());

    let url = match explicit {
        Some(url) => url,
        None if environment.is_production() => PRODUCTION_API_URL,
        None => LOCAL_API_URL,
    };
    url.trim_end_matches('/').to_string()
}

/// The resolved backend location. Computed once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub api_url: String,
    pub environment: RuntimeEnv,
}

impl BackendConfig {
    pub fn resolve(override_url: Option<&str>, environment: RuntimeEnv) -> Self {
        Self {
            api_url: resolve_api_url(override_url, environment),
            environment,
        }
    }

    /// Full URL for a backend path, e.g. `endpoint("health")`.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_url, path)
        } else {
            format!("{}/{}", self.api_url, path)
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Upper bound on live UI sessions; the least recently seen go first.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_bind()               -> String { "127.0.0.1:3000".to_string() }
fn default_max_upload_bytes()   -> usize  { 10 * 1024 * 1024 }
fn default_max_sessions()       -> usize  { 1_000 }
fn default_request_timeout_ms() -> u64    { 60_000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| ChatLomhatError::Config(format!("invalid bind address '{}': {}", self.bind, e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    pub api_url: Option<String>,
    #[serde(default)]
    pub environment: RuntimeEnv,
    /// Applies to every backend call, the health probe included.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            environment: RuntimeEnv::default(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

mod tests;

impl AppConfig {
    /// Load configuration from chatlomhat.toml (if present) and the process environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = Self::from_file_if_exists(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn from_file_if_exists(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Environment variables take precedence over file values.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.backend.api_url = Some(url);
        }
        if let Some(env) = lookup(ENV_RUNTIME) {
            self.backend.environment = RuntimeEnv::parse(&env);
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.trim().is_empty()) {
            self.server.bind = bind;
        }
    }

    pub fn backend_config(&self) -> BackendConfig {
        let backend = BackendConfig::resolve(self.backend.api_url.as_deref(), self.backend.environment);
        tracing::info!(
            environment = %backend.environment,
            api_url = %backend.api_url,
            "Resolved backend API URL"
        );
        backend
    }
}
