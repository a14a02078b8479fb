//! Wire types exchanged with the math backend.
//! Field names follow the backend's JSON contract (camelCase where it uses it).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChatLomhatError;

/// Prompt sent alongside an image when the user typed nothing.
pub const DEFAULT_IMAGE_PROMPT: &str = "Solve this math problem shown in the image";

/// Status marker the backend reports from `/health` when it is up.
pub const HEALTHY_STATUS: &str = "healthy";

/// Default number of exercises requested.
pub const DEFAULT_NUM_PROBLEMS: u32 = 5;

// ── Solve ─────────────────────────────────────────────────────────────────────

/// An uploaded problem image, kept in memory for the lifetime of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// `data:` URL suitable for an `<img src>` preview.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveRequest {
    pub prompt: Option<String>,
    pub image: Option<ImageUpload>,
}

impl SolveRequest {
    /// Build the request the backend expects from raw form inputs.
    /// With an image, a blank prompt is replaced by [`DEFAULT_IMAGE_PROMPT`].
    pub fn from_inputs(problem: &str, image: Option<ImageUpload>) -> Self {
        let typed = (!problem.trim().is_empty()).then(|| problem.to_string());
        match image {
            Some(image) => Self {
                prompt: Some(typed.unwrap_or_else(|| DEFAULT_IMAGE_PROMPT.to_string())),
                image: Some(image),
            },
            None => Self { prompt: typed, image: None },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prompt.as_deref().map_or(true, |p| p.trim().is_empty()) && self.image.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ── Exercises ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ChatLomhatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ChatLomhatError::InvalidInput(format!("unknown difficulty '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    #[serde(rename = "numProblems")]
    pub num_problems: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub problem: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub error: Option<String>,
}

// ── Health / errors ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY_STATUS
    }
}

/// Fixed body returned by the proxy routes when the backend cannot be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn backend_unreachable() -> Self {
        Self {
            success: false,
            error: "Error contacting backend".to_string(),
        }
    }
}
