//! Error types for the exam clock
//!
//! The timer engines treat every invalid request as a no-op, so the only
//! engine failure is a poisoned lock. Everything else here is raised by the
//! HTTP layer before a request reaches an engine.

use thiserror::Error;

use crate::state::ExamId;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// A state mutex was poisoned by a panicking holder
    #[error("failed to lock {0} state")]
    LockPoisoned(&'static str),

    /// Request carried a value the exam form would never produce
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("exam {0} not found")]
    ExamNotFound(ExamId),

    /// Request is not allowed in the current state (e.g. editing while running)
    #[error("{0}")]
    Conflict(&'static str),
}

/// Out-of-range configuration rejected at the API boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("exam label must not be empty")]
    EmptyLabel,

    #[error("working time must be {min}-{max} minutes in steps of {step}, got {got}")]
    WorkingMinutes { got: u32, min: u32, max: u32, step: u32 },

    #[error("{field} must be one of 0, 5, 10, 15 or 20 minutes, got {got}")]
    PrepMinutes { field: &'static str, got: u32 },

    #[error("duration must be between 1 and {max} minutes, got {got}")]
    Duration { got: u32, max: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
