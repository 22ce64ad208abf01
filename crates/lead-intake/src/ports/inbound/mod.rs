//! Inbound ports (Use case traits)
//!
//! Hexagonal architecture: what a host UI drives.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::LeadCreated;
use crate::application::session::{SessionError, SubmissionPhase};
use crate::application::store::FormAction;
use crate::domain::aggregates::LeadDraft;
use crate::error::IntakeResult;

/// Lead intake form use cases
#[async_trait]
pub trait LeadIntakeUseCases: Send + Sync {
    /// Current draft snapshot
    fn draft(&self) -> Arc<LeadDraft>;

    /// Apply one user edit
    fn apply(&self, action: FormAction) -> Result<(), SessionError>;

    /// Where the submission state machine currently is
    fn phase(&self) -> SubmissionPhase;

    /// Validate and submit the draft
    async fn submit(&self, auth_token: &str) -> IntakeResult<LeadCreated>;
}
