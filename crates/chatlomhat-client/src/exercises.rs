//! Exercise Generator form.
//!
//! Idle → Generating → (Populated | Errored). Starting a new generation drops
//! the previous set together with every reveal flag.

use chatlomhat_common::models::{
    Difficulty, Exercise, ExerciseRequest, ExerciseResponse, DEFAULT_NUM_PROBLEMS,
};
use thiserror::Error;

use crate::backend::MathApi;
use crate::error::ClientError;
use crate::sequence::{RequestSequence, RequestTicket};

pub const GENERATE_FAILED_MESSAGE: &str = "Failed to generate exercises";
pub const BACKEND_DOWN_MESSAGE: &str =
    "Error: Could not generate exercises. Make sure the backend is running.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateBlocked {
    #[error("Please enter a topic")]
    MissingTopic,
}

/// An exercise plus its client-only reveal flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseCard {
    pub exercise: Exercise,
    pub revealed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeneratorPhase {
    #[default]
    Idle,
    Generating,
    Populated(Vec<ExerciseCard>),
    Errored(String),
}

#[derive(Debug, Clone)]
pub struct ExerciseGenerator {
    topic: String,
    difficulty: Difficulty,
    num_problems: u32,
    phase: GeneratorPhase,
    sequence: RequestSequence,
}

impl Default for ExerciseGenerator {
    fn default() -> Self {
        Self {
            topic: String::new(),
            difficulty: Difficulty::default(),
            num_problems: DEFAULT_NUM_PROBLEMS,
            phase: GeneratorPhase::Idle,
            sequence: RequestSequence::new(),
        }
    }
}

impl ExerciseGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn num_problems(&self) -> u32 {
        self.num_problems
    }

    pub fn set_num_problems(&mut self, num_problems: u32) {
        self.num_problems = num_problems;
    }

    /// Parse the raw count field; anything unusable means the default of 5.
    pub fn set_num_problems_input(&mut self, raw: &str) {
        self.num_problems = raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_NUM_PROBLEMS);
    }

    pub fn phase(&self) -> &GeneratorPhase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, GeneratorPhase::Generating)
    }

    /// Cards of the current set; empty unless populated.
    pub fn cards(&self) -> &[ExerciseCard] {
        match &self.phase {
            GeneratorPhase::Populated(cards) => cards,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            GeneratorPhase::Errored(message) => Some(message),
            _ => None,
        }
    }

    /// The exact body sent to the backend.
    pub fn request(&self) -> ExerciseRequest {
        ExerciseRequest {
            topic: self.topic.clone(),
            difficulty: self.difficulty,
            num_problems: self.num_problems,
        }
    }

    pub fn begin_generate(&mut self) -> Result<(RequestTicket, ExerciseRequest), GenerateBlocked> {
        if self.topic.trim().is_empty() {
            return Err(GenerateBlocked::MissingTopic);
        }
        let ticket = self.sequence.issue();
        self.phase = GeneratorPhase::Generating;
        Ok((ticket, self.request()))
    }

    /// Apply a backend result. Returns false when the ticket was superseded.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<ExerciseResponse, ClientError>,
    ) -> bool {
        if !self.sequence.is_current(ticket) {
            tracing::debug!(ticket = ticket.id(), "Discarding stale exercise response");
            return false;
        }

        self.phase = match result {
            Ok(resp) if resp.success => GeneratorPhase::Populated(
                resp.exercises
                    .into_iter()
                    .map(|exercise| ExerciseCard { exercise, revealed: false })
                    .collect(),
            ),
            Ok(resp) => GeneratorPhase::Errored(
                resp.error.unwrap_or_else(|| GENERATE_FAILED_MESSAGE.to_string()),
            ),
            Err(e) => {
                tracing::warn!("Exercise generation failed: {}", e);
                GeneratorPhase::Errored(BACKEND_DOWN_MESSAGE.to_string())
            }
        };
        true
    }

    /// Flip one card's reveal flag. Returns the new flag, or None if out of range.
    pub fn toggle_answer(&mut self, index: usize) -> Option<bool> {
        match &mut self.phase {
            GeneratorPhase::Populated(cards) => cards.get_mut(index).map(|card| {
                card.revealed = !card.revealed;
                card.revealed
            }),
            _ => None,
        }
    }

    pub async fn generate(&mut self, api: &dyn MathApi) -> Result<bool, GenerateBlocked> {
        let (ticket, request) = self.begin_generate()?;
        let result = api.generate_exercises(&request).await;
        Ok(self.complete(ticket, result))
    }
}
