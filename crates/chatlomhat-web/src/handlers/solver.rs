//! Math Solver tab.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Html,
    Form,
};
use chatlomhat_client::{MathApi, Paragraph, SolverForm};
use chatlomhat_common::models::ImageUpload;
use uuid::Uuid;

use crate::handlers::pages::{render_page, Tab};
use crate::handlers::SessionForm;
use crate::render::escape;
use crate::session::session_id;
use crate::state::SharedState;

const NOT_AN_IMAGE_MESSAGE: &str = "Please choose an image file";
const IMAGE_TOO_LARGE_MESSAGE: &str = "Image is too large";
const UNREADABLE_FORM_MESSAGE: &str = "The form could not be read, please try again";

/// Inputs pulled out of the solver's multipart form.
#[derive(Debug, Default)]
struct SolverInputs {
    session: Option<String>,
    problem: String,
    image: Option<ImageUpload>,
    rejected_upload: bool,
}

/// A form that failed part-way. The session field comes first, so it is
/// usually known even when a later part was not.
#[derive(Debug)]
struct UnreadableForm {
    session: Option<String>,
    notice: &'static str,
}

async fn read_inputs(mut multipart: Multipart) -> Result<SolverInputs, UnreadableForm> {
    let mut inputs = SolverInputs::default();
    loop {
        match read_field(&mut multipart, &mut inputs).await {
            Ok(true) => {}
            Ok(false) => return Ok(inputs),
            Err(e) => {
                tracing::warn!(status = e.status().as_u16(), "Malformed solver form: {}", e);
                let notice = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    IMAGE_TOO_LARGE_MESSAGE
                } else {
                    UNREADABLE_FORM_MESSAGE
                };
                return Err(UnreadableForm { session: inputs.session, notice });
            }
        }
    }
}

/// Read one part into `inputs`. Returns false once the form is exhausted.
async fn read_field(multipart: &mut Multipart, inputs: &mut SolverInputs) -> Result<bool, MultipartError> {
    let Some(field) = multipart.next_field().await? else {
        return Ok(false);
    };

    let name = field.name().unwrap_or_default().to_string();
    match name.as_str() {
        "session" => inputs.session = Some(field.text().await?),
        "problem" => inputs.problem = field.text().await?,
        "image" => {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await?;
            // Browsers send an empty part when no file was chosen.
            if !bytes.is_empty() {
                if mime_type.starts_with("image/") {
                    inputs.image = Some(ImageUpload::new(file_name, mime_type, bytes.to_vec()));
                } else {
                    inputs.rejected_upload = true;
                }
            }
        }
        _ => {}
    }
    Ok(true)
}

/// POST /ui/solver
pub async fn solver_submit(State(state): State<SharedState>, multipart: Multipart) -> Html<String> {
    let inputs = match read_inputs(multipart).await {
        Ok(inputs) => inputs,
        Err(unreadable) => {
            let id = session_id(unreadable.session.as_deref());
            return render_page(&state, id, Tab::Solver, Some(unreadable.notice.to_string())).await;
        }
    };
    let id = session_id(inputs.session.as_deref());

    if inputs.rejected_upload {
        return render_page(&state, id, Tab::Solver, Some(NOT_AN_IMAGE_MESSAGE.to_string())).await;
    }

    let begun = state
        .sessions
        .with(id, |s| {
            s.solver.set_problem(inputs.problem);
            if let Some(image) = inputs.image {
                s.solver.attach_image(image);
            }
            s.solver.begin_submit()
        })
        .await;

    let notice = match begun {
        Ok((ticket, request)) => {
            // Detached so the form still leaves `Submitting` if the visitor goes away.
            let task_state = Arc::clone(&state);
            let task = tokio::spawn(async move {
                let result = task_state.backend.solve(request).await;
                task_state
                    .sessions
                    .update(id, |s| s.solver.complete(ticket, result))
                    .await;
            });
            if let Err(e) = task.await {
                tracing::error!("Solve task failed: {}", e);
            }
            None
        }
        Err(blocked) => Some(blocked.to_string()),
    };

    render_page(&state, id, Tab::Solver, notice).await
}

/// POST /ui/solver/remove-image
pub async fn solver_remove_image(
    State(state): State<SharedState>,
    Form(form): Form<SessionForm>,
) -> Html<String> {
    let id = session_id(form.session.as_deref());
    state.sessions.with(id, |s| s.solver.remove_image()).await;
    render_page(&state, id, Tab::Solver, None).await
}

pub fn render_solver_panel(id: Uuid, form: &SolverForm, notice: Option<&str>) -> String {
    let notice_html = notice
        .map(|n| format!(r#"<div class="alert alert-warning">{}</div>"#, escape(n)))
        .unwrap_or_default();

    let preview_html = match form.image_preview() {
        Some(preview) => format!(r#"
        <div class="image-preview">
            <img src="{}" alt="Uploaded problem">
            <form method="post" action="/ui/solver/remove-image">
                <input type="hidden" name="session" value="{}">
                <button type="submit" class="btn btn-link text-danger">Remove</button>
            </form>
        </div>"#, escape(&preview), id),
        None => String::new(),
    };

    let button_html = if form.is_busy() {
        r#"<button type="submit" class="btn btn-primary w-100" disabled><span class="spinner"></span>Solving...</button>"#
    } else {
        r#"<button type="submit" class="btn btn-primary w-100">Solve Problem</button>"#
    };

    let error_html = form
        .error()
        .map(|e| format!(r#"<div class="alert alert-danger"><strong>Error:</strong> {}</div>"#, escape(e)))
        .unwrap_or_default();

    let solution_html = match form.paragraphs() {
        Some(paragraphs) => format!(r#"
        <div class="solution">
            <h3>Solution:</h3>
            <div class="solution-body">{}</div>
        </div>"#, render_paragraphs(&paragraphs)),
        None => String::new(),
    };

    format!(r#"
    <h2>Math Problem Solver</h2>
    <p class="text-muted">Enter your math problem below or upload an image of the problem, and I'll help you solve it step by step.</p>
    {}
    <form method="post" action="/ui/solver" enctype="multipart/form-data">
        <input type="hidden" name="session" value="{}">
        <div class="form-group">
            <label for="problem">Math Problem (Type your problem or describe what you need help with)</label>
            <textarea id="problem" name="problem" rows="4" class="form-control" placeholder="Example: Solve for x: 2x + 5 = 13">{}</textarea>
        </div>
        <div class="form-group">
            <label for="image">Upload Image (Optional)</label>
            <input id="image" name="image" type="file" accept="image/*" class="form-control">
        </div>
        {}
    </form>
    {}
    {}
    {}"#,
        notice_html,
        id,
        escape(form.problem()),
        button_html,
        preview_html,
        error_html,
        solution_html,
    )
}

fn render_paragraphs(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(|p| match p {
            Paragraph::Text(line) => format!("<p>{}</p>", escape(line)),
            Paragraph::Spacer => r#"<div class="spacer"></div>"#.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlomhat_client::solver::split_paragraphs;

    #[test]
    fn test_paragraph_markup() {
        let html = render_paragraphs(&split_paragraphs("Step 1...\nStep 2...\nx=4"));
        assert_eq!(html, "<p>Step 1...</p><p>Step 2...</p><p>x=4</p>");
        assert_eq!(html.matches("<p>").count(), 3);
    }

    #[test]
    fn test_spacer_markup() {
        let html = render_paragraphs(&split_paragraphs("a\n\nb"));
        assert_eq!(html, r#"<p>a</p><div class="spacer"></div><p>b</p>"#);
    }

    #[test]
    fn test_problem_text_is_escaped() {
        let mut form = SolverForm::new();
        form.set_problem("x < 3 && y > 2");
        let html = render_solver_panel(Uuid::new_v4(), &form, None);
        assert!(html.contains("x &lt; 3 &amp;&amp; y &gt; 2"));
    }
}
