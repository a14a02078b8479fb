//! chatlomhat-common: Shared configuration, errors, and wire types used across all ChatLomhat crates.

pub mod error;
pub mod config;
pub mod models;

// Re-export commonly used types
pub use config::{AppConfig, BackendConfig, RuntimeEnv, ServerConfig};
pub use error::{ChatLomhatError, Result};
