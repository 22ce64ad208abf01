//! Lead Intake
//!
//! Captures a new sales lead through a multi-section form, validates it and
//! submits it to the CRM lead service.
//!
//! ## Architecture
//!
//! - **Domain Layer**: `LeadDraft` aggregate, contact list, value objects,
//!   validation rules, domain events
//! - **Application Layer**: form store, submission client, intake session
//!   state machine, wire DTOs
//! - **Ports Layer**: Hexagonal architecture interfaces
//! - **Infrastructure Layer**: HTTP gateway, broadcast event bus, user
//!   providers
//!
//! ## Flow
//!
//! 1. Mount an [`IntakeSession`]: a fresh [`LeadId`] is generated and the
//!    owner is prefilled from the current user
//! 2. Apply [`FormAction`]s as the user edits
//! 3. `submit` validates, posts the flat [`LeadPayload`] and broadcasts
//!    [`LeadEvent::LeadsChanged`] on success

pub mod domain;
pub mod application;
pub mod ports;
pub mod infrastructure;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use domain::aggregates::{
    BasicField, BudgetMentioned, BusinessField, BusinessProfile, Contact, ContactError, ContactField, ContactList,
    DraftError, LeadDraft, LeadStatus, Qualification, QualificationUpdate,
};
pub use domain::value_objects::{
    normalize_prefix, Address, AddressField, ContactId, DealValue, LeadId, DEFAULT_LEAD_PREFIX,
};
pub use domain::events::LeadEvent;
pub use domain::services::{validate, ValidationError};
pub use application::{
    FormAction, FormStateStore, IntakeSession, LeadCreated, LeadPayload, SessionError, SubmissionClient,
    SubmissionPhase,
};
pub use ports::inbound::LeadIntakeUseCases;
pub use ports::outbound::{
    CurrentUserProvider, LeadEventPublisher, LeadGateway, Navigator, NoopNavigator, NoopPublisher, UserIdentity,
};
pub use infrastructure::{BroadcastLeadEvents, EnvUserProvider, HttpLeadGateway, StaticUserProvider};
pub use config::{ConfigError, IntakeConfig};
pub use error::{IntakeError, IntakeResult};
