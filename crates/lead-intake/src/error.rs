//! Error types for lead intake

use thiserror::Error;

use crate::domain::services::ValidationError;

/// Message shown when the backend gives no usable reason
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to create lead";

/// Lead intake error type.
///
/// Every variant is recoverable: the form returns to an editable state with
/// the draft untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// Draft breaks a submission rule; never reaches the network
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Token missing locally or refused by the backend
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Request could not be completed
    #[error("network error: {0}")]
    Network(String),

    /// Backend answered without a truthy `success`
    #[error("{message}")]
    ServerRejection { status: Option<u16>, message: String },

    /// Backend base URL is not configured
    #[error("config error: {0}")]
    Configuration(String),

    /// A submission for this form is already in flight
    #[error("a submission is already in progress")]
    SubmissionInProgress,
}

impl IntakeError {
    /// Text for the user-facing toast
    pub fn user_message(&self) -> String {
        match self {
            Self::ServerRejection { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type for lead intake
pub type IntakeResult<T> = Result<T, IntakeError>;
