//! Error types for insta-tasks

use thiserror::Error;

/// insta-tasks error type
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task validation failed")]
    Validation,

    #[error("Result validation failed")]
    ResultValidation,

    #[error("Unsupported task type: {0}")]
    Unsupported(String),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("Task execution failed: {0}")]
    Execution(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TaskError>;
