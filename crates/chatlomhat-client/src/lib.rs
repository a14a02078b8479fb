//! chatlomhat-client: Talks to the math backend and holds the form state behind the UI.
//!   - `backend`     : HTTP client: health probe, solve, exercise generation, raw forwarding
//!   - `solver`      : Math Solver form state machine
//!   - `exercises`   : Exercise Generator form state machine
//!   - `connectivity`: tri-state backend connectivity
//!   - `sequence`    : request tickets that keep stale responses out

pub mod backend;
pub mod connectivity;
pub mod error;
pub mod exercises;
pub mod sequence;
pub mod solver;

pub use backend::{BackendClient, MathApi, RelayedResponse};
pub use connectivity::ConnectivityStatus;
pub use error::ClientError;
pub use exercises::{ExerciseCard, ExerciseGenerator, GenerateBlocked, GeneratorPhase};
pub use sequence::{RequestSequence, RequestTicket};
pub use solver::{Paragraph, SolverForm, SolverPhase, SubmitBlocked};
