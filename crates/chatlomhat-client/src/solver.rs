//! Math Solver form.
//!
//! Idle → Submitting → (Solved | Errored); every new submission starts over.
//! Results are only applied for the most recent submission.

use chatlomhat_common::models::{ImageUpload, SolveRequest, SolveResponse};
use thiserror::Error;

use crate::backend::MathApi;
use crate::error::ClientError;
use crate::sequence::{RequestSequence, RequestTicket};

pub const NO_SOLUTION_MESSAGE: &str = "No solution received";
pub const SOLVE_FAILED_MESSAGE: &str = "Failed to solve problem";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("Please enter a math problem or upload an image")]
    MissingInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SolverPhase {
    #[default]
    Idle,
    Submitting,
    Solved(String),
    Errored(String),
}

/// One rendered block of a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paragraph {
    Text(String),
    /// A blank input line, rendered as vertical space.
    Spacer,
}

/// Split solution text on line breaks. Whitespace-only lines become spacers.
pub fn split_paragraphs(text: &str) -> Vec<Paragraph> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .map(|line| {
            if line.trim().is_empty() {
                Paragraph::Spacer
            } else {
                Paragraph::Text(line.to_string())
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SolverForm {
    problem: String,
    image: Option<ImageUpload>,
    phase: SolverPhase,
    sequence: RequestSequence,
}

impl SolverForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn problem(&self) -> &str {
        &self.problem
    }

    pub fn set_problem(&mut self, problem: impl Into<String>) {
        self.problem = problem.into();
    }

    pub fn attach_image(&mut self, image: ImageUpload) {
        self.image = Some(image);
    }

    pub fn remove_image(&mut self) {
        self.image = None;
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    /// `data:` URL for the attached image, built on demand.
    pub fn image_preview(&self) -> Option<String> {
        self.image.as_ref().map(ImageUpload::to_data_url)
    }

    pub fn phase(&self) -> &SolverPhase {
        &self.phase
    }

    /// While true the submit control is disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, SolverPhase::Submitting)
    }

    pub fn paragraphs(&self) -> Option<Vec<Paragraph>> {
        match &self.phase {
            SolverPhase::Solved(text) => Some(split_paragraphs(text)),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            SolverPhase::Errored(message) => Some(message),
            _ => None,
        }
    }

    /// Validate the inputs and move to `Submitting`.
    /// Blocked submissions leave the form untouched and must not reach the network.
    pub fn begin_submit(&mut self) -> Result<(RequestTicket, SolveRequest), SubmitBlocked> {
        let request = SolveRequest::from_inputs(&self.problem, self.image.clone());
        if request.is_empty() {
            return Err(SubmitBlocked::MissingInput);
        }
        let ticket = self.sequence.issue();
        self.phase = SolverPhase::Submitting;
        Ok((ticket, request))
    }

    /// Apply a backend result. Returns false when the ticket was superseded.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<SolveResponse, ClientError>,
    ) -> bool {
        if !self.sequence.is_current(ticket) {
            tracing::debug!(ticket = ticket.id(), "Discarding stale solve response");
            return false;
        }

        self.phase = match result {
            Ok(SolveResponse { solution: Some(solution), .. }) if !solution.is_empty() => {
                SolverPhase::Solved(solution)
            }
            Ok(SolveResponse { error: Some(error), .. }) => SolverPhase::Errored(error),
            Ok(_) => SolverPhase::Solved(NO_SOLUTION_MESSAGE.to_string()),
            Err(e) => {
                tracing::warn!("Solve request failed: {}", e);
                SolverPhase::Errored(SOLVE_FAILED_MESSAGE.to_string())
            }
        };
        true
    }

    /// Run one full submission against `api`.
    pub async fn submit(&mut self, api: &dyn MathApi) -> Result<bool, SubmitBlocked> {
        let (ticket, request) = self.begin_submit()?;
        let result = api.solve(request).await;
        Ok(self.complete(ticket, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatlomhat_common::models::{ExerciseRequest, ExerciseResponse};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeApi {
        calls: AtomicUsize,
        seen: Mutex<Vec<SolveRequest>>,
        reply: SolveResponse,
    }

    impl FakeApi {
        fn replying(solution: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                reply: SolveResponse { solution: Some(solution.to_string()), error: None },
            }
        }
    }

    #[async_trait]
    impl MathApi for FakeApi {
        async fn solve(&self, req: SolveRequest) -> crate::error::Result<SolveResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(req);
            Ok(self.reply.clone())
        }

        async fn generate_exercises(&self, _req: &ExerciseRequest) -> crate::error::Result<ExerciseResponse> {
            unreachable!("solver never generates exercises")
        }
    }

    #[tokio::test]
    async fn test_empty_submission_makes_no_call() {
        let api = FakeApi::replying("unused");
        let mut form = SolverForm::new();
        form.set_problem("   ");

        assert_eq!(form.submit(&api).await, Err(SubmitBlocked::MissingInput));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(form.phase(), &SolverPhase::Idle);
    }

    #[tokio::test]
    async fn test_solution_renders_three_paragraphs() {
        let api = FakeApi::replying("Step 1...\nStep 2...\nx=4");
        let mut form = SolverForm::new();
        form.set_problem("Solve for x: 2x+5=13");

        assert_eq!(form.submit(&api).await, Ok(true));
        assert_eq!(
            form.paragraphs().unwrap(),
            vec![
                Paragraph::Text("Step 1...".to_string()),
                Paragraph::Text("Step 2...".to_string()),
                Paragraph::Text("x=4".to_string()),
            ]
        );
        let seen = api.seen.lock().unwrap();
        assert_eq!(seen[0].prompt.as_deref(), Some("Solve for x: 2x+5=13"));
        assert!(seen[0].image.is_none());
    }

    #[tokio::test]
    async fn test_image_only_submission_uses_default_prompt() {
        let api = FakeApi::replying("x = 4");
        let mut form = SolverForm::new();
        form.attach_image(ImageUpload::new("eq.png", "image/png", vec![0x89, 0x50]));

        form.submit(&api).await.unwrap();
        let seen = api.seen.lock().unwrap();
        assert_eq!(
            seen[0].prompt.as_deref(),
            Some(chatlomhat_common::models::DEFAULT_IMAGE_PROMPT)
        );
        assert!(seen[0].image.is_some());
    }

    #[test]
    fn test_blank_lines_become_spacers() {
        assert_eq!(
            split_paragraphs("a\n\nb"),
            vec![
                Paragraph::Text("a".to_string()),
                Paragraph::Spacer,
                Paragraph::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_remove_image_clears_preview() {
        let mut form = SolverForm::new();
        form.attach_image(ImageUpload::new("eq.png", "image/png", b"abc".to_vec()));
        assert_eq!(form.image_preview().as_deref(), Some("data:image/png;base64,YWJj"));

        form.remove_image();
        assert!(form.image().is_none());
        assert!(form.image_preview().is_none());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut form = SolverForm::new();
        form.set_problem("1+1");
        let (first, _) = form.begin_submit().unwrap();
        let (second, _) = form.begin_submit().unwrap();

        let applied = form.complete(
            second,
            Ok(SolveResponse { solution: Some("2".to_string()), error: None }),
        );
        assert!(applied);

        let applied = form.complete(
            first,
            Ok(SolveResponse { solution: Some("stale".to_string()), error: None }),
        );
        assert!(!applied);
        assert_eq!(form.phase(), &SolverPhase::Solved("2".to_string()));
    }

    #[test]
    fn test_backend_error_is_shown_verbatim() {
        let mut form = SolverForm::new();
        form.set_problem("what's the weather?");
        let (ticket, _) = form.begin_submit().unwrap();
        form.complete(
            ticket,
            Ok(SolveResponse { solution: None, error: Some("Only math questions are supported".to_string()) }),
        );
        assert_eq!(form.error(), Some("Only math questions are supported"));
    }

    #[test]
    fn test_empty_solution_falls_back() {
        let mut form = SolverForm::new();
        form.set_problem("2+2");
        let (ticket, _) = form.begin_submit().unwrap();
        form.complete(ticket, Ok(SolveResponse::default()));
        assert_eq!(form.phase(), &SolverPhase::Solved(NO_SOLUTION_MESSAGE.to_string()));
    }

    #[test]
    fn test_transport_failure_is_generic() {
        let mut form = SolverForm::new();
        form.set_problem("2+2");
        let (ticket, _) = form.begin_submit().unwrap();
        assert!(form.is_busy());
        form.complete(ticket, Err(ClientError::Status { status: 502 }));
        assert_eq!(form.error(), Some(SOLVE_FAILED_MESSAGE));
        assert!(!form.is_busy());
    }
}
