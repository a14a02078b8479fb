//! Exercise Generator tab.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Html,
    Form,
};
use chatlomhat_client::{ExerciseGenerator, MathApi};
use chatlomhat_common::models::Difficulty;
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::pages::{render_page, Tab};
use crate::handlers::SessionForm;
use crate::render::escape;
use crate::session::session_id;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ExerciseForm {
    pub session: Option<String>,
    #[serde(default)]
    pub topic: String,
    pub difficulty: Option<String>,
    pub num_problems: Option<String>,
}

/// POST /ui/exercises
pub async fn exercises_submit(
    State(state): State<SharedState>,
    Form(form): Form<ExerciseForm>,
) -> Html<String> {
    let id = session_id(form.session.as_deref());
    let difficulty = form
        .difficulty
        .as_deref()
        .and_then(|d| d.parse::<Difficulty>().ok())
        .unwrap_or_default();

    let begun = state
        .sessions
        .with(id, |s| {
            s.exercises.set_topic(form.topic);
            s.exercises.set_difficulty(difficulty);
            s.exercises.set_num_problems_input(form.num_problems.as_deref().unwrap_or_default());
            s.exercises.begin_generate()
        })
        .await;

    let notice = match begun {
        Ok((ticket, request)) => {
            // Detached so the generator still leaves `Generating` if the visitor goes away.
            let task_state = Arc::clone(&state);
            let task = tokio::spawn(async move {
                let result = task_state.backend.generate_exercises(&request).await;
                task_state
                    .sessions
                    .update(id, |s| s.exercises.complete(ticket, result))
                    .await;
            });
            if let Err(e) = task.await {
                tracing::error!("Exercise generation task failed: {}", e);
            }
            None
        }
        Err(blocked) => Some(blocked.to_string()),
    };

    render_page(&state, id, Tab::Exercises, notice).await
}

/// POST /ui/exercises/{index}/toggle
pub async fn exercises_toggle(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
    Form(form): Form<SessionForm>,
) -> Html<String> {
    let id = session_id(form.session.as_deref());
    let toggled = state.sessions.with(id, |s| s.exercises.toggle_answer(index)).await;
    if toggled.is_none() {
        tracing::debug!(index, "Toggle for an exercise that is not on screen");
    }
    render_page(&state, id, Tab::Exercises, None).await
}

pub fn render_exercises_panel(id: Uuid, generator: &ExerciseGenerator, notice: Option<&str>) -> String {
    let notice_html = notice
        .map(|n| format!(r#"<div class="alert alert-warning">{}</div>"#, escape(n)))
        .unwrap_or_default();

    let options: String = Difficulty::ALL
        .iter()
        .map(|d| {
            let selected = if *d == generator.difficulty() { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, d.as_str(), selected, d.label())
        })
        .collect();

    let button_html = if generator.is_busy() {
        r#"<button type="submit" class="btn btn-success w-100" disabled>Generating...</button>"#
    } else {
        r#"<button type="submit" class="btn btn-success w-100">Generate Practice Problems</button>"#
    };

    let error_html = generator
        .error()
        .map(|e| format!(r#"<div class="alert alert-danger"><strong>Error:</strong> {}</div>"#, escape(e)))
        .unwrap_or_default();

    let cards = generator.cards();
    let cards_html = if cards.is_empty() {
        String::new()
    } else {
        let rendered: String = cards
            .iter()
            .enumerate()
            .map(|(i, card)| {
                let answer_html = if card.revealed {
                    format!(
                        r#"<div class="answer"><strong>Answer:</strong><div>{}</div></div>"#,
                        escape(&card.exercise.answer)
                    )
                } else {
                    String::new()
                };
                format!(r#"
            <div class="exercise-card">
                <div class="d-flex justify-between">
                    <h4>Problem {}:</h4>
                    <form method="post" action="/ui/exercises/{}/toggle">
                        <input type="hidden" name="session" value="{}">
                        <button type="submit" class="btn btn-link">{}</button>
                    </form>
                </div>
                <p>{}</p>
                {}
            </div>"#,
                    i + 1,
                    i,
                    id,
                    if card.revealed { "Hide Answer" } else { "Show Answer" },
                    escape(&card.exercise.problem),
                    answer_html,
                )
            })
            .collect();
        format!(r#"<div class="exercises"><h3>Practice Problems:</h3>{}</div>"#, rendered)
    };

    format!(r#"
    <h2>Practice Exercise Generator</h2>
    {}
    <form method="post" action="/ui/exercises">
        <input type="hidden" name="session" value="{}">
        <div class="form-group">
            <label for="topic">Topic:</label>
            <input id="topic" name="topic" type="text" class="form-control" required value="{}" placeholder="e.g., algebra, calculus, geometry">
        </div>
        <div class="grid-2">
            <div class="form-group">
                <label for="difficulty">Difficulty:</label>
                <select id="difficulty" name="difficulty" class="form-control">{}</select>
            </div>
            <div class="form-group">
                <label for="num_problems">Number of Problems:</label>
                <input id="num_problems" name="num_problems" type="number" min="1" max="10" class="form-control" value="{}">
            </div>
        </div>
        {}
    </form>
    {}
    {}"#,
        notice_html,
        id,
        escape(generator.topic()),
        options,
        generator.num_problems(),
        button_html,
        error_html,
        cards_html,
    )
}
