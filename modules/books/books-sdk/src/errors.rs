//! Errors returned by [`crate::BooksHttpClient`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BooksError {
    /// No or invalid credentials (401).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The caller lacks the required capability (403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// The request was rejected as malformed or invalid (400, 422).
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The gateway could not reach a live instance (502, 503, 504).
    #[error("Service unavailable: {message}")]
    Unavailable { message: String },

    /// Any other non-success answer.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The request never produced an HTTP answer, or the answer was unreadable.
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl BooksError {
    /// Classify a non-success status with the problem detail (if any).
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            400 | 422 => Self::Validation { message },
            502..=504 => Self::Unavailable { message },
            _ => Self::Server { status, message },
        }
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
