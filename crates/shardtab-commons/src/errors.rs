//! Shared error types for shardtab.
//!
//! Engine crates define their own `thiserror` enums; this one covers the
//! validation failures of the shared identifier types.

use std::fmt;

/// Common error type for identifier and model validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Invalid input provided to a constructor
    InvalidInput(String),

    /// Resource already exists (duplicate creation)
    AlreadyExists(String),
}

impl CommonError {
    /// Creates an InvalidInput error with a message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates an AlreadyExists error with a message.
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommonError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CommonError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
        }
    }
}

impl std::error::Error for CommonError {}

/// Result type alias using CommonError.
pub type Result<T> = std::result::Result<T, CommonError>;
