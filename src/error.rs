use thiserror::Error;

/// A field-level constraint violation on task input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable description of the violated constraint.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors produced by repository operations.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Task with ID {0} not found")]
    NotFound(u64),
    #[error("task store unavailable: {0}")]
    Storage(#[from] std::io::Error),
}

pub type TaskResult<T> = Result<T, TaskError>;
