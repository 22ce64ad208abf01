//! Intake session
//!
//! One mounted form: the draft store plus an explicit submission state
//! machine. Replaces independent `loading` / `error` flags with a single
//! phase that only moves along the edges below.
//!
//! ```text
//! Idle ──submit──▶ Validating ──invalid──▶ Error ──edit──▶ Idle
//!                       │                    ▲
//!                     valid                failure
//!                       ▼                    │
//!                  Submitting ───────────────┘
//!                       │
//!                    success
//!                       ▼
//!                    Success (navigated away)
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use parking_lot::RwLock;

use crate::application::dto::LeadCreated;
use crate::application::store::{FormAction, FormStateStore};
use crate::application::submission::SubmissionClient;
use crate::config::IntakeConfig;
use crate::domain::aggregates::{BusinessField, DraftError, LeadDraft};
use crate::domain::services::{validate, ValidationError};
use crate::error::{IntakeError, IntakeResult};
use crate::ports::inbound::LeadIntakeUseCases;
use crate::ports::outbound::CurrentUserProvider;

// =============================================================================
// State machine
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    /// Editable again, showing the last failure
    Error(IntakeError),
    /// Terminal: the backend accepted the lead
    Success(LeadCreated),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionEvent {
    SubmitRequested,
    ValidationPassed,
    ValidationFailed(ValidationError),
    Succeeded(LeadCreated),
    Failed(IntakeError),
    Edited,
}

impl SubmissionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Error(_) => "error",
            Self::Success(_) => "success",
        }
    }

    /// Submit button disabled
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }

    /// Draft may be edited
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Idle | Self::Error(_))
    }

    pub fn error(&self) -> Option<&IntakeError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Next phase for `event`, or an error if the edge does not exist
    pub fn transition(&self, event: SubmissionEvent) -> Result<SubmissionPhase, InvalidTransition> {
        use SubmissionEvent as E;

        let next = match (self, event) {
            (Self::Idle | Self::Error(_), E::SubmitRequested) => Self::Validating,
            (Self::Validating, E::ValidationPassed) => Self::Submitting,
            (Self::Validating, E::ValidationFailed(err)) => Self::Error(IntakeError::Validation(err)),
            (Self::Validating | Self::Submitting, E::Failed(err)) => Self::Error(err),
            (Self::Submitting, E::Succeeded(created)) => Self::Success(created),
            (Self::Idle | Self::Error(_), E::Edited) => Self::Idle,
            (from, event) => {
                return Err(InvalidTransition {
                    from: from.name(),
                    event: event.name(),
                })
            }
        };
        Ok(next)
    }
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SubmissionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitRequested => "submit_requested",
            Self::ValidationPassed => "validation_passed",
            Self::ValidationFailed(_) => "validation_failed",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
            Self::Edited => "edited",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply {event} while {from}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub event: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("form is {0}; edits are not accepted")]
    Locked(&'static str),
}

// =============================================================================
// Session
// =============================================================================

/// A mounted intake form
pub struct IntakeSession {
    store: RwLock<FormStateStore>,
    phase: RwLock<SubmissionPhase>,
    client: SubmissionClient,
}

impl IntakeSession {
    pub fn new(store: FormStateStore, client: SubmissionClient) -> Self {
        Self {
            store: RwLock::new(store),
            phase: RwLock::new(SubmissionPhase::Idle),
            client,
        }
    }

    /// Mount a fresh form: new lead id from the local clock, owner prefilled
    /// from the current user when one is known
    pub fn mount(config: &IntakeConfig, users: &dyn CurrentUserProvider, client: SubmissionClient) -> Self {
        let mut store = FormStateStore::new(&config.lead_prefix, &Local::now());
        if let Some(user) = users.current_user() {
            tracing::debug!("Prefilling lead owner with {}", user.label());
            store.set_business(BusinessField::AssignedTo, user.id);
        }
        tracing::debug!("Mounted intake form for {}", store.draft().lead_id());
        Self::new(store, client)
    }

    pub fn snapshot(&self) -> Arc<LeadDraft> {
        self.store.read().snapshot()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.phase.read().is_loading()
    }

    /// Apply an edit. Leaves the error phase; refused while a submission is
    /// running or after success.
    pub fn dispatch(&self, action: FormAction) -> Result<(), SessionError> {
        let mut phase = self.phase.write();
        if !phase.is_editable() {
            return Err(SessionError::Locked(phase.name()));
        }

        self.store.write().dispatch(action)?;

        if let Ok(next) = phase.transition(SubmissionEvent::Edited) {
            *phase = next;
        }
        Ok(())
    }

    /// Validate and submit the current draft.
    ///
    /// At most one submission runs at a time; a second call while loading
    /// fails with [`IntakeError::SubmissionInProgress`] without touching the
    /// network. After success the stored confirmation is returned again.
    pub async fn submit(&self, auth_token: &str) -> IntakeResult<LeadCreated> {
        let draft = {
            let mut phase = self.phase.write();
            if let SubmissionPhase::Success(created) = &*phase {
                return Ok(created.clone());
            }
            let next = phase.transition(SubmissionEvent::SubmitRequested).map_err(|e| {
                tracing::warn!("Submit ignored: {}", e);
                IntakeError::SubmissionInProgress
            })?;
            *phase = next;

            let draft = self.store.read().snapshot();
            if let Some(err) = validate(&draft) {
                tracing::warn!("Lead {} failed validation: {}", draft.lead_id(), err);
                self.step(&mut phase, SubmissionEvent::ValidationFailed(err));
                return Err(err.into());
            }
            self.step(&mut phase, SubmissionEvent::ValidationPassed);
            draft
        };

        let _abandoned = AbandonedSubmission { phase: &self.phase };
        let result = self.client.submit_validated(&draft, auth_token).await;

        let mut phase = self.phase.write();
        match &result {
            Ok(created) => self.step(&mut phase, SubmissionEvent::Succeeded(created.clone())),
            Err(err) => {
                tracing::warn!("Lead {} not created: {}", draft.lead_id(), err);
                self.step(&mut phase, SubmissionEvent::Failed(err.clone()));
            }
        }
        result
    }

    fn step(&self, phase: &mut SubmissionPhase, event: SubmissionEvent) {
        match phase.transition(event) {
            Ok(next) => {
                tracing::debug!("Intake phase {} -> {}", phase, next);
                *phase = next;
            }
            Err(e) => tracing::error!("Intake state machine: {}", e),
        }
    }
}

/// Returns the form to an editable state when a submit future is dropped
/// while the request is still in flight
struct AbandonedSubmission<'a> {
    phase: &'a RwLock<SubmissionPhase>,
}

impl Drop for AbandonedSubmission<'_> {
    fn drop(&mut self) {
        let mut phase = self.phase.write();
        if *phase != SubmissionPhase::Submitting {
            return;
        }
        tracing::warn!("Submission abandoned before the lead service answered");
        let event = SubmissionEvent::Failed(IntakeError::Network("submission abandoned".into()));
        if let Ok(next) = phase.transition(event) {
            *phase = next;
        }
    }
}

#[async_trait]
impl LeadIntakeUseCases for IntakeSession {
    fn draft(&self) -> Arc<LeadDraft> {
        self.snapshot()
    }

    fn apply(&self, action: FormAction) -> Result<(), SessionError> {
        self.dispatch(action)
    }

    fn phase(&self) -> SubmissionPhase {
        IntakeSession::phase(self)
    }

    async fn submit(&self, auth_token: &str) -> IntakeResult<LeadCreated> {
        IntakeSession::submit(self, auth_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::LeadPayload;
    use crate::domain::aggregates::{BasicField, ContactField};
    use crate::domain::value_objects::AddressField;
    use crate::infrastructure::identity::StaticUserProvider;
    use crate::ports::outbound::{LeadGateway, UserIdentity};
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct FixedGateway {
        calls: AtomicUsize,
        outcome: Result<(), IntakeError>,
        gate: Option<Arc<Notify>>,
    }

    impl FixedGateway {
        fn ok() -> Self {
            Self { calls: AtomicUsize::new(0), outcome: Ok(()), gate: None }
        }

        fn failing(err: IntakeError) -> Self {
            Self { calls: AtomicUsize::new(0), outcome: Err(err), gate: None }
        }
    }

    #[async_trait]
    impl LeadGateway for FixedGateway {
        async fn create_lead(&self, payload: &LeadPayload, _auth_token: &str) -> Result<LeadCreated, IntakeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.outcome.clone().map(|_| LeadCreated {
                lead_id: payload.lead_id.clone(),
                record_id: None,
                message: None,
            })
        }
    }

    fn filled_store() -> FormStateStore {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut store = FormStateStore::new("LEAD", &now);
        store.set_basic(BasicField::CompanyName, "Acme").unwrap();
        store.set_business(BusinessField::AssignedTo, "Priya");
        store.update_contact(0, ContactField::FullName, "Raj").unwrap();
        store.update_contact(0, ContactField::Email, "raj@x.com").unwrap();
        store.set_address(AddressField::Country, "India");
        store
    }

    fn session(gateway: Arc<FixedGateway>, store: FormStateStore) -> IntakeSession {
        IntakeSession::new(store, SubmissionClient::detached(gateway))
    }

    #[test]
    fn test_transition_table() {
        let idle = SubmissionPhase::Idle;
        let validating = idle.transition(SubmissionEvent::SubmitRequested).unwrap();
        assert_eq!(validating, SubmissionPhase::Validating);
        assert!(validating.is_loading());

        let err = validating
            .transition(SubmissionEvent::ValidationFailed(ValidationError::MissingOwner))
            .unwrap();
        assert_eq!(err.error(), Some(&IntakeError::Validation(ValidationError::MissingOwner)));
        assert!(err.is_editable());
        assert_eq!(err.transition(SubmissionEvent::Edited).unwrap(), SubmissionPhase::Idle);

        let submitting = SubmissionPhase::Submitting;
        assert!(submitting.transition(SubmissionEvent::SubmitRequested).is_err());
        assert!(submitting.transition(SubmissionEvent::Edited).is_err());
        assert!(SubmissionPhase::Idle.transition(SubmissionEvent::ValidationPassed).is_err());
    }

    #[test]
    fn test_success_is_terminal() {
        let done = SubmissionPhase::Success(LeadCreated {
            lead_id: "LEAD-20240601120000".into(),
            record_id: None,
            message: None,
        });
        assert!(!done.is_editable());
        let err = done.transition(SubmissionEvent::SubmitRequested).unwrap_err();
        assert_eq!(err.to_string(), "cannot apply submit_requested while success");
    }

    #[tokio::test]
    async fn test_successful_submit_locks_form() {
        let gateway = Arc::new(FixedGateway::ok());
        let session = session(gateway.clone(), filled_store());

        let created = session.submit("token").await.unwrap();
        assert!(matches!(session.phase(), SubmissionPhase::Success(_)));

        let again = session.submit("token").await.unwrap();
        assert_eq!(again, created);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);

        assert_eq!(
            session.dispatch(FormAction::AddContact),
            Err(SessionError::Locked("success"))
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_draft_and_returns_to_editable() {
        let gateway = Arc::new(FixedGateway::failing(IntakeError::ServerRejection {
            status: Some(200),
            message: "Duplicate lead".into(),
        }));
        let session = session(gateway, filled_store());
        let before = session.snapshot();

        let err = session.submit("token").await.unwrap_err();

        assert_eq!(err.user_message(), "Duplicate lead");
        assert!(session.phase().is_editable());
        assert_eq!(*session.snapshot(), *before);

        session
            .dispatch(FormAction::SetBasic { field: BasicField::Website, value: "acme.io".into() })
            .unwrap();
        assert_eq!(session.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_network() {
        let gateway = Arc::new(FixedGateway::ok());
        let mut store = filled_store();
        store.set_business(BusinessField::AssignedTo, "");
        let session = session(gateway.clone(), store);

        let err = session.submit("token").await.unwrap_err();

        assert_eq!(err, IntakeError::Validation(ValidationError::MissingOwner));
        assert_eq!(session.phase().error(), Some(&err));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_refused() {
        let gate = Arc::new(Notify::new());
        let gateway = Arc::new(FixedGateway {
            calls: AtomicUsize::new(0),
            outcome: Ok(()),
            gate: Some(gate.clone()),
        });
        let session = Arc::new(session(gateway.clone(), filled_store()));

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.submit("token").await }
        });

        while gateway.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(session.is_loading());
        assert_eq!(session.submit("token").await, Err(IntakeError::SubmissionInProgress));
        assert!(session.dispatch(FormAction::AddContact).is_err());

        gate.notify_one();
        assert!(first.await.unwrap().is_ok());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mount_prefills_owner_from_current_user() {
        let users = StaticUserProvider::new(Some(UserIdentity::new("u-17").with_display_name("Priya")));
        let config = IntakeConfig::default().with_lead_prefix("RL");
        let session = IntakeSession::mount(&config, &users, SubmissionClient::detached(Arc::new(FixedGateway::ok())));

        let draft = session.snapshot();
        assert_eq!(draft.business_profile().assigned_to, "u-17");
        assert!(draft.lead_id().as_str().starts_with("RL-"));
        assert!(draft.lead_id().is_well_formed());
    }

    #[test]
    fn test_use_case_trait_submit() {
        let session = session(Arc::new(FixedGateway::ok()), filled_store());
        let use_cases: &dyn LeadIntakeUseCases = &session;
        let created = tokio_test::block_on(use_cases.submit("token")).unwrap();
        assert_eq!(created.lead_id, use_cases.draft().lead_id().as_str());
    }

    #[tokio::test]
    async fn test_dropped_submit_unlocks_form() {
        let gate = Arc::new(Notify::new());
        let gateway = Arc::new(FixedGateway {
            calls: AtomicUsize::new(0),
            outcome: Ok(()),
            gate: Some(gate.clone()),
        });
        let session = session(gateway.clone(), filled_store());

        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(50), session.submit("token")).await;
        assert!(timed_out.is_err());

        assert_eq!(
            session.phase().error(),
            Some(&IntakeError::Network("submission abandoned".into()))
        );
        session
            .dispatch(FormAction::SetBasic { field: BasicField::Website, value: "acme.io".into() })
            .unwrap();

        gate.notify_one();
        assert!(session.submit("token").await.is_ok());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_session_with_unusable_prefix_still_submits() {
        let config = IntakeConfig::from_lookup(|key| (key == crate::config::LEAD_PREFIX_ENV).then(|| "rl2".to_string()));
        let users = StaticUserProvider::new(Some(UserIdentity::new("u-17")));
        let session = IntakeSession::mount(&config, &users, SubmissionClient::detached(Arc::new(FixedGateway::ok())));
        for action in [
            FormAction::SetBasic { field: BasicField::CompanyName, value: "Acme".into() },
            FormAction::SetAddress { field: AddressField::Country, value: "India".into() },
            FormAction::UpdateContact { index: 0, field: ContactField::FullName, value: "Raj".into() },
            FormAction::UpdateContact { index: 0, field: ContactField::Email, value: "raj@x.com".into() },
        ] {
            session.dispatch(action).unwrap();
        }

        assert!(session.snapshot().lead_id().is_well_formed());
        assert!(session.submit("token").await.is_ok());
    }
}
