//! chatlomhat-web: Web front end for the ChatLomhat math assistant.
//! Provides:
//!   - Math Solver tab (typed or photographed problems)
//!   - Exercise Generator tab with per-answer reveal
//!   - `/solve` and `/generate-exercises` proxies to the backend
//!   - Backend connectivity probe
//!   - About page

pub mod router;
pub mod handlers;
pub mod render;
pub mod session;
pub mod state;
