//! Error types for quiz-core.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using QuizError.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors from session and store operations.
///
/// Parsing and serialization are total by design and never report errors;
/// malformed text degrades to a partial model instead.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("quiz bank has no questions")]
    EmptyBank,

    #[error("saved quiz {0} not found")]
    QuizNotFound(Uuid),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed saved quiz: {0}")]
    Json(#[from] serde_json::Error),
}
