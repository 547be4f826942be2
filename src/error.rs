// Typed errors for the task list core

use crate::task::{MAX_TEXT_CHARS, TaskId};

/// Errors raised when a snapshot cannot be imported.
///
/// Any of these leaves the current list untouched.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid snapshot: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("Duplicate task id in snapshot: {0}")]
    DuplicateId(TaskId),

    #[error("Task at index {index} has empty text")]
    EmptyText { index: usize },

    #[error("Task at index {index} has text of {len} chars (max {max})", max = MAX_TEXT_CHARS)]
    TextTooLong { index: usize, len: usize },
}

/// Errors raised by `validate_text` before a task is created
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("Task text cannot be empty")]
    Empty,

    #[error("Task text too long: {0} chars (max {max})", max = MAX_TEXT_CHARS)]
    TooLong(usize),
}
