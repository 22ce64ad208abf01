//! Application layer
//!
//! Orchestrates use cases and coordinates domain objects.

pub mod dto;
pub mod session;
pub mod store;
pub mod submission;

pub use dto::*;
pub use session::{IntakeSession, InvalidTransition, SessionError, SubmissionEvent, SubmissionPhase};
pub use store::{FormAction, FormStateStore};
pub use submission::SubmissionClient;
