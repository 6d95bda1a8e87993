use crate::error::ConsoleError;

/// Failures between a [`ResourceClient`](super::ResourceClient) and its actor.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum BackendError {
    #[error("Backend closed")]
    Closed,
    #[error("Backend dropped response channel")]
    Dropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    /// An entity hook refused the request.
    #[error("Rejected: {0}")]
    Rejected(String),
}

impl From<BackendError> for ConsoleError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Closed | BackendError::Dropped => ConsoleError::Request(e.to_string()),
            BackendError::NotFound(id) => ConsoleError::NotFound(id),
            BackendError::Rejected(message) => ConsoleError::Rejected { message },
        }
    }
}
