//! HTTP handlers for all web routes.

use serde::Deserialize;

pub mod pages;
pub mod solver;
pub mod exercises;
pub mod proxy;
pub mod health;

/// Forms that only carry the hidden session id.
#[derive(Debug, Deserialize)]
pub struct SessionForm {
    pub session: Option<String>,
}
