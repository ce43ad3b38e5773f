use thiserror::Error;

/// Error type for TodoId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error type for TodoText validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoTextError {
    #[error("Todo text is empty")]
    Empty,

    #[error("Todo text too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error type for all todo-related operations.
///
/// `NotFound` covers both unknown ids and ids owned by another user.
#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Invalid todo ID: {0}")]
    InvalidTodoId(#[from] TodoIdError),

    #[error("Invalid todo text: {0}")]
    InvalidText(#[from] TodoTextError),

    // Domain-level errors
    #[error("Todo not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
