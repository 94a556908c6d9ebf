//! Error types shared across the crate.
//!
//! Long-running procedures report cooperative cancellation through
//! [`cancel_this::Cancellable`]. Everything that can fail because of malformed *input*
//! (state strings, expressions, network definitions, learned models) reports a
//! [`FormatError`] instead, and this error is never silently repaired.

use cancel_this::Cancelled;

/// Malformed state string, expression, configuration or artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Invalid state `{state}`: {reason}")]
    InvalidState { state: String, reason: String },
    #[error("State `{state}` has {found} variables, expected {expected}")]
    StateWidth {
        state: String,
        found: usize,
        expected: usize,
    },
    #[error("Cannot parse expression `{expression}` at position {position}: {reason}")]
    Expression {
        expression: String,
        position: usize,
        reason: String,
    },
    #[error("Variable `{0}` is missing from the assignment")]
    MissingVariable(String),
    #[error("Unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("Invalid network definition: {0}")]
    Network(String),
    #[error("Invalid learned model: {0}")]
    LearnedModel(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Cannot parse JSON document: {0}")]
    Json(String),
}

impl From<serde_json::Error> for FormatError {
    fn from(value: serde_json::Error) -> Self {
        FormatError::Json(value.to_string())
    }
}

/// Failure of the external structure-learning tool.
#[derive(Debug, thiserror::Error)]
pub enum LearnerError {
    #[error("Cannot start learner `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Learner exited with status {status}: {stderr}")]
    ExitStatus { status: String, stderr: String },
    #[error("Learner did not produce `{0}`")]
    MissingOutput(String),
}

/// Failure of one network's pipeline. Other networks are unaffected by it.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Learner(#[from] LearnerError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Computation cancelled: {0}")]
    Cancelled(String),
}

impl From<Cancelled> for PipelineError {
    fn from(value: Cancelled) -> Self {
        PipelineError::Cancelled(value.to_string())
    }
}
