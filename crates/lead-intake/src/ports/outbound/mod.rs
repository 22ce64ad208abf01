//! Outbound ports
//!
//! Hexagonal architecture: the capabilities the intake workflow needs from
//! its host. Infrastructure provides the concrete implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::dto::{LeadCreated, LeadPayload};
use crate::domain::events::LeadEvent;
use crate::error::IntakeError;

/// Remote lead service
#[async_trait]
pub trait LeadGateway: Send + Sync {
    /// Create one lead. Performs a single attempt; never retries.
    async fn create_lead(&self, payload: &LeadPayload, auth_token: &str) -> Result<LeadCreated, IntakeError>;
}

/// Fire-and-forget lead notifications
pub trait LeadEventPublisher: Send + Sync {
    /// Publish an event. Having no listeners is not an error.
    fn publish(&self, event: LeadEvent);
}

/// The signed-in user, if the host knows one
pub trait CurrentUserProvider: Send + Sync {
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Host navigation, invoked after a lead is accepted
pub trait Navigator: Send + Sync {
    fn lead_created(&self, created: &LeadCreated);
}

/// Identity of the internal user operating the form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub display_name: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), display_name: None }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Display name when present, otherwise the id
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Publisher that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl LeadEventPublisher for NoopPublisher {
    fn publish(&self, _event: LeadEvent) {}
}

/// Navigator for hosts that handle the success outcome themselves
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn lead_created(&self, _created: &LeadCreated) {}
}
