use thiserror::Error;

use crate::domain::MAX_NAME_CHARS;

/// Failures detected before anything is sent. The display text doubles as the
/// notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("gesture name must not be empty")]
    EmptyName,
    #[error("gesture name must not exceed {max} characters")]
    NameTooLong { max: usize },
    #[error("a gesture named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("add at least one direction")]
    EmptyDirections,
    #[error("unknown direction \"{0}\"")]
    UnknownDirection(String),
    #[error("action code must not be empty")]
    EmptyAction,
}

impl ValidationError {
    pub fn name_too_long() -> Self {
        Self::NameTooLong {
            max: MAX_NAME_CHARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

#[derive(Debug, Error)]
pub enum GestureError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Protocol(String),
}

impl GestureError {
    /// Maps a `{success: false, message}` reply onto the taxonomy. The message is kept
    /// verbatim so it can be shown as-is.
    pub fn from_rejection(operation: Operation, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("{} was rejected by the server", operation.as_str()));
        let lower = message.to_lowercase();

        if lower.contains("not found")
            || lower.contains("does not exist")
            || lower.contains("no such")
            || message.contains("不存在")
        {
            return Self::NotFound(message);
        }
        if lower.contains("exists") || lower.contains("duplicate") || message.contains("已存在") {
            return Self::Conflict(message);
        }

        match operation {
            Operation::Add => Self::Conflict(message),
            Operation::Delete => Self::NotFound(message),
            Operation::Update => Self::Rejected(message),
        }
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
