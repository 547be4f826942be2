// Task record and its identifier and status types

use crate::error::TextError;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Maximum task text length, in characters
pub const MAX_TEXT_CHARS: usize = 80;

/// Opaque task identifier
///
/// Snapshots may carry either numeric or string ids, so both are accepted.
/// Any JSON number is a valid id (negative, fractional, exponent form).
/// Tasks created by this crate always get a time-ordered UUIDv7 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(serde_json::Number),
    Text(String),
}

impl TaskId {
    /// Generate a fresh id for a newly created task
    pub fn generate() -> Self {
        TaskId::Text(uuid::Uuid::now_v7().to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{}", n),
            TaskId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// All-digit input parses as a numeric id, anything else as a string id.
impl FromStr for TaskId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => TaskId::Number(n.into()),
            Err(_) => TaskId::Text(s.to_string()),
        })
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        TaskId::Number(n.into())
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

/// Task status
///
/// `Completed` also accepts the legacy label "That's Completed" when read
/// from a snapshot; it is always written back as "Completed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    #[serde(alias = "That's Completed")]
    Completed,
}

impl Status {
    /// Canonical label, as written to snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    id: TaskId,
    text: String,
    status: Status,
}

impl Task {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            text: text.into(),
            status: Status::Pending,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

/// Check task text before it is handed to `TaskList::create`
///
/// Returns the trimmed text. Length is counted in Unicode scalar values.
pub fn validate_text(text: &str) -> Result<&str, TextError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TextError::Empty);
    }

    let len = trimmed.chars().count();
    if len > MAX_TEXT_CHARS {
        return Err(TextError::TooLong(len));
    }

    Ok(trimmed)
}
