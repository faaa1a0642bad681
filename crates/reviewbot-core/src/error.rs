//! Error types observable at the core boundary

use thiserror::Error;

/// Failure to obtain a classification from the sentiment server.
///
/// Network errors, non-success statuses, timeouts and malformed bodies all
/// collapse into this one kind. `reason` is kept for logging only; the chat
/// shows the same notice no matter what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("connection to sentiment server failed: {reason}")]
    ConnectionFailure { reason: String },
}

impl ClassifyError {
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::ConnectionFailure {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for ClassifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::connection(err.to_string())
    }
}

/// Illegal session transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no classification request is pending")]
    NotPending,
}
