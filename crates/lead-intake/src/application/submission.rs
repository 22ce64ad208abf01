//! Submission client
//!
//! Validates a draft, flattens it to the wire payload, sends it once and
//! fires the success side effects.

use std::sync::Arc;

use crate::application::dto::{LeadCreated, LeadPayload};
use crate::domain::aggregates::LeadDraft;
use crate::domain::events::LeadEvent;
use crate::domain::services::ensure_valid;
use crate::error::{IntakeError, IntakeResult};
use crate::ports::outbound::{LeadEventPublisher, LeadGateway, Navigator, NoopNavigator, NoopPublisher};

pub struct SubmissionClient {
    gateway: Arc<dyn LeadGateway>,
    event_publisher: Arc<dyn LeadEventPublisher>,
    navigator: Arc<dyn Navigator>,
}

impl SubmissionClient {
    pub fn new(
        gateway: Arc<dyn LeadGateway>,
        event_publisher: Arc<dyn LeadEventPublisher>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            gateway,
            event_publisher,
            navigator,
        }
    }

    /// Client without observers or navigation
    pub fn detached(gateway: Arc<dyn LeadGateway>) -> Self {
        Self::new(gateway, Arc::new(NoopPublisher), Arc::new(NoopNavigator))
    }

    /// Submit a draft.
    ///
    /// Order of checks: validation, then the token, then the network. The
    /// "leads changed" event and navigation fire only after the backend
    /// confirms.
    pub async fn submit(&self, draft: &LeadDraft, auth_token: &str) -> IntakeResult<LeadCreated> {
        let payload = self.build_payload(draft)?;
        self.send(payload, auth_token).await
    }

    /// Submit a draft the caller has already validated
    pub(crate) async fn submit_validated(&self, draft: &LeadDraft, auth_token: &str) -> IntakeResult<LeadCreated> {
        self.send(LeadPayload::from_draft(draft), auth_token).await
    }

    /// Flatten a validated draft
    pub fn build_payload(&self, draft: &LeadDraft) -> IntakeResult<LeadPayload> {
        ensure_valid(draft)?;
        Ok(LeadPayload::from_draft(draft))
    }

    async fn send(&self, payload: LeadPayload, auth_token: &str) -> IntakeResult<LeadCreated> {
        let token = auth_token.trim();
        if token.is_empty() {
            return Err(IntakeError::Auth("no access token available".into()));
        }

        tracing::info!("Submitting lead {} for {}", payload.lead_id, payload.company_name);
        let created = self.gateway.create_lead(&payload, token).await?;

        tracing::info!("Lead {} created", created.lead_id);
        self.event_publisher.publish(LeadEvent::LeadsChanged);
        self.navigator.lead_created(&created);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{BasicField, BusinessField, ContactField};
    use crate::domain::services::ValidationError;
    use crate::domain::value_objects::AddressField;
    use crate::infrastructure::events::BroadcastLeadEvents;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingGateway {
        calls: Mutex<Vec<(LeadPayload, String)>>,
        reject_with: Option<IntakeError>,
    }

    #[async_trait]
    impl LeadGateway for RecordingGateway {
        async fn create_lead(&self, payload: &LeadPayload, auth_token: &str) -> Result<LeadCreated, IntakeError> {
            self.calls.lock().push((payload.clone(), auth_token.to_string()));
            match &self.reject_with {
                Some(err) => Err(err.clone()),
                None => Ok(LeadCreated {
                    lead_id: payload.lead_id.clone(),
                    record_id: Some("1".into()),
                    message: None,
                }),
            }
        }
    }

    #[derive(Default)]
    struct CountingNavigator(Mutex<u32>);

    impl Navigator for CountingNavigator {
        fn lead_created(&self, _created: &LeadCreated) {
            *self.0.lock() += 1;
        }
    }

    fn valid_draft() -> LeadDraft {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut draft = LeadDraft::new("LEAD", &now);
        draft.set_basic(BasicField::CompanyName, "Acme").unwrap();
        draft.set_business(BusinessField::AssignedTo, "Priya");
        draft.update_contact(0, ContactField::FullName, "Raj").unwrap();
        draft.update_contact(0, ContactField::Email, "raj@x.com").unwrap();
        draft.set_address(AddressField::Country, "India");
        draft
    }

    #[tokio::test]
    async fn test_success_fires_side_effects_once() {
        let gateway = Arc::new(RecordingGateway::default());
        let events = Arc::new(BroadcastLeadEvents::new());
        let mut rx = events.subscribe();
        let navigator = Arc::new(CountingNavigator::default());
        let client = SubmissionClient::new(gateway.clone(), events.clone(), navigator.clone());

        let created = client.submit(&valid_draft(), " token-1 ").await.unwrap();

        assert_eq!(created.lead_id, "LEAD-20240601120000");
        let calls = gateway.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.contact_name, "Raj");
        assert_eq!(calls[0].1, "token-1");
        assert_eq!(rx.try_recv().unwrap(), LeadEvent::LeadsChanged);
        assert_eq!(*navigator.0.lock(), 1);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let client = SubmissionClient::detached(gateway.clone());

        let mut draft = valid_draft();
        draft.set_basic(BasicField::CompanyName, "").unwrap();
        draft.set_business(BusinessField::AssignedTo, "");

        let err = client.submit(&draft, "token").await.unwrap_err();
        assert_eq!(err, IntakeError::Validation(ValidationError::MissingCompanyName));
        assert!(gateway.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_is_auth_error() {
        let gateway = Arc::new(RecordingGateway::default());
        let client = SubmissionClient::detached(gateway.clone());

        let err = client.submit(&valid_draft(), "  ").await.unwrap_err();
        assert!(matches!(err, IntakeError::Auth(_)));
        assert!(gateway.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_has_no_side_effects() {
        let gateway = Arc::new(RecordingGateway {
            reject_with: Some(IntakeError::ServerRejection { status: Some(409), message: "Duplicate lead".into() }),
            ..Default::default()
        });
        let events = Arc::new(BroadcastLeadEvents::new());
        let mut rx = events.subscribe();
        let navigator = Arc::new(CountingNavigator::default());
        let client = SubmissionClient::new(gateway, events.clone(), navigator.clone());

        let err = client.submit(&valid_draft(), "token").await.unwrap_err();

        assert_eq!(err.user_message(), "Duplicate lead");
        assert!(rx.try_recv().is_err());
        assert_eq!(*navigator.0.lock(), 0);
    }

    #[tokio::test]
    async fn test_prevalidated_draft_is_not_checked_again() {
        let gateway = Arc::new(RecordingGateway::default());
        let client = SubmissionClient::detached(gateway.clone());

        let mut draft = valid_draft();
        draft.set_address(AddressField::Country, "");

        client.submit_validated(&draft, "token").await.unwrap();
        assert_eq!(gateway.calls.lock().len(), 1);
        assert_eq!(gateway.calls.lock()[0].0.country, "");
    }
}
