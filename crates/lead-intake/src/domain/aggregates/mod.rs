//! Aggregates module

pub mod contact;
pub mod lead;

pub use contact::{Contact, ContactError, ContactField, ContactList};
pub use lead::{
    BasicField, BudgetMentioned, BusinessField, BusinessProfile, DraftError, LeadDraft, LeadStatus,
    Qualification, QualificationUpdate, DEFAULT_LEAD_SOURCE,
};
