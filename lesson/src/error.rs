//! Error types for the lesson model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LessonError {
    #[error("Invalid level: {0} (expected 1, 2 or 3)")]
    InvalidLevel(u8),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
