//! # Console Errors
//!
//! Every failure that crosses a component boundary in the console is expressed as a
//! [`ConsoleError`]. Loaders store it in their state, the modal controller reports it,
//! and pages turn it into a notification. It is `Clone` so the same error can be
//! stored in [`ResourceState`](crate::loader::ResourceState) and returned to the caller.

use crate::validation::ValidationErrors;

/// Message shown when a failure carries nothing more specific.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Errors surfaced by loaders, modal submissions and page actions.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ConsoleError {
    /// The loader was built without a fetch operation.
    #[error("No fetch operation configured")]
    MissingFetchOperation,

    /// The request never produced a response (transport, closed backend).
    #[error("Request failed: {0}")]
    Request(String),

    /// The backend answered and refused the request.
    #[error("Backend rejected request: {message}")]
    Rejected { message: String },

    /// The addressed record does not exist.
    #[error("Item not found: {0}")]
    NotFound(String),

    /// The session is missing or expired.
    #[error("Unauthorized")]
    Unauthorized,

    /// Signed in, but the role may not open this page.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Field rules rejected the input before submission.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

impl ConsoleError {
    /// Builds a [`ConsoleError::Rejected`] from anything printable.
    pub fn rejected(message: impl Into<String>) -> Self {
        ConsoleError::Rejected {
            message: message.into(),
        }
    }

    /// True for field-level failures, which must not be reported as generic errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, ConsoleError::Validation(_))
    }

    /// The text to put in front of the user.
    ///
    /// Backend rejections carry their own message; everything else falls back to
    /// [`GENERIC_FAILURE_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Rejected { message } if !message.trim().is_empty() => message.clone(),
            ConsoleError::NotFound(what) => format!("Not found: {what}"),
            ConsoleError::Unauthorized => "Your session has expired, please sign in again".to_string(),
            ConsoleError::Forbidden(_) => "You do not have access to this page".to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ConsoleError::rejected("Household code already exists");
        assert_eq!(err.user_message(), "Household code already exists");
    }

    #[test]
    fn test_user_message_falls_back_to_generic() {
        assert_eq!(
            ConsoleError::Request("connection reset".into()).user_message(),
            GENERIC_FAILURE_MESSAGE
        );
        assert_eq!(ConsoleError::rejected("  ").user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_validation_is_distinguishable() {
        let err = ConsoleError::Validation(ValidationErrors::default());
        assert!(err.is_validation());
        assert!(!ConsoleError::MissingFetchOperation.is_validation());
    }
}
