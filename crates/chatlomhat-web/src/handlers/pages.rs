//! Home page (tabbed solver / generator) and the about page.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
};
use chatlomhat_client::ConnectivityStatus;
use chatlomhat_common::BackendConfig;
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::{exercises::render_exercises_panel, solver::render_solver_panel, SessionForm};
use crate::render::{escape, page};
use crate::session::{parse_session, session_id, UiSession};
use crate::state::SharedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Solver,
    Exercises,
}

impl Tab {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("exercises") | Some("exercise") => Tab::Exercises,
            _ => Tab::Solver,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Tab::Solver => "solver",
            Tab::Exercises => "exercises",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub tab: Option<String>,
    pub session: Option<String>,
}

/// GET /: renders at once. Every load starts a fresh connectivity check.
pub async fn home(
    State(state): State<SharedState>,
    Query(query): Query<HomeQuery>,
) -> Html<String> {
    let id = session_id(query.session.as_deref());
    let tab = Tab::parse(query.tab.as_deref());

    state
        .sessions
        .with(id, |s| s.connectivity = ConnectivityStatus::Checking)
        .await;

    render_page(&state, id, tab, None).await
}

/// Re-render the home page from the session's current state.
/// A session still in `Checking` gets a background probe; the page never waits on it.
pub async fn render_page(state: &SharedState, id: Uuid, tab: Tab, notice: Option<String>) -> Html<String> {
    let backend = state.backend.config();
    let (html, start_probe) = state
        .sessions
        .with(id, |session| {
            let start_probe = session.connectivity == ConnectivityStatus::Checking && !session.probing;
            if start_probe {
                session.probing = true;
            }
            (render_home(id, tab, session, backend, notice.as_deref()), start_probe)
        })
        .await;

    if start_probe {
        spawn_probe(state, id);
    }
    Html(html)
}

fn spawn_probe(state: &SharedState, id: Uuid) {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        let status = ConnectivityStatus::probe(&state.backend).await;
        state
            .sessions
            .update(id, |s| {
                s.connectivity = status;
                s.probing = false;
            })
            .await;
    });
}

pub fn render_home(
    id: Uuid,
    tab: Tab,
    session: &UiSession,
    backend: &BackendConfig,
    notice: Option<&str>,
) -> String {
    let tab_link = |target: Tab, label: &str| {
        let class = if target == tab { "tab active" } else { "tab" };
        format!(
            r#"<a class="{}" href="/?tab={}&amp;session={}">{}</a>"#,
            class, target.as_str(), id, label
        )
    };

    let panel = match tab {
        Tab::Solver => render_solver_panel(id, &session.solver, notice),
        Tab::Exercises => render_exercises_panel(id, &session.exercises, notice),
    };

    let main = format!(r#"
    <div class="hero text-center">
        <h1 class="page-title">ChatLomhat Math Helper</h1>
        <p class="text-muted">Your AI-powered math assistant for solving problems and generating practice exercises</p>
        {}
    </div>
    <div class="tabs">
        {}
        {}
    </div>
    <div class="card panel">
        {}
    </div>"#,
        render_connectivity(session.connectivity, backend),
        tab_link(Tab::Solver, "Math Solver"),
        tab_link(Tab::Exercises, "Exercise Generator"),
        panel,
    );

    page("Math Helper", Some(id), &main)
}

/// The banner is refreshed client-side from `/api/health` by `static/js/connectivity.js`.
fn render_connectivity(status: ConnectivityStatus, backend: &BackendConfig) -> String {
    format!(
        r#"<div id="connection" data-status="{}">{}</div>"#,
        status.as_str(),
        connectivity_banner(status, backend)
    )
}

fn connectivity_banner(status: ConnectivityStatus, backend: &BackendConfig) -> String {
    match status {
        ConnectivityStatus::Checking => {
            r#"<div class="connection text-muted">🔄 Testing API connection...</div>"#.to_string()
        }
        ConnectivityStatus::Connected => format!(
            r#"<div class="connection text-success">✅ API Connected ({})</div>"#,
            escape(&backend.api_url)
        ),
        ConnectivityStatus::Disconnected => format!(
            r#"<div class="connection text-danger">
            <span>❌ API Connection Failed</span>
            <div class="small">Trying to connect to: {}</div>
            <div class="small">Environment: {}</div>
        </div>"#,
            escape(&backend.api_url),
            backend.environment
        ),
    }
}

/// GET /about
pub async fn about(Query(query): Query<SessionForm>) -> Html<String> {
    Html(page("About", parse_session(query.session.as_deref()), r#"
    <div class="hero text-center">
        <h1 class="page-title">About ChatLomhat</h1>
        <p class="text-muted">
            ChatLomhat is an intelligent lomhat (teacher) assistant powered by AI that helps students with their studies
            and solves their academic problems. Designed to provide personalized learning support and educational
            guidance in a conversational format.
        </p>
    </div>
    <div class="grid-2">
        <section class="card p-4">
            <h2>What it does</h2>
            <ul>
                <li>Solves math problems step-by-step with clear explanations.</li>
                <li>Generates practice exercises tailored to your level.</li>
                <li>Supports common topics like algebra, calculus, and geometry.</li>
            </ul>
        </section>
        <section class="card p-4">
            <h2>Why ChatLomhat</h2>
            <p>We built ChatLomhat to make math more approachable. Whether you're preparing for exams or learning a
            new concept, the goal is to make learning feel guided, interactive, and stress-free.</p>
        </section>
    </div>
    <section class="card p-4 mt-4">
        <h2>Our mission</h2>
        <p>Empower learners everywhere with an always-available math companion that explains concepts clearly,
        encourages curiosity, and builds lasting confidence.</p>
    </section>
    <section class="card p-4 mt-4" id="contact">
        <h2>Get in touch</h2>
        <p>Have feedback or need help? Reach out at
        <a href="mailto:cheamenghour20@gmail.com">cheamenghour20@gmail.com</a>.</p>
    </section>"#))
}
