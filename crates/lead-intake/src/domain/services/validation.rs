//! Draft validation
//!
//! Rules run in a fixed order and the first failure wins, so the message a
//! user sees for a given draft is always the same.

use crate::domain::aggregates::LeadDraft;

/// Why a draft cannot be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    #[error("Company name is required")]
    MissingCompanyName,

    #[error("Lead owner is required")]
    MissingOwner,

    #[error("Primary contact needs a name and an email")]
    InvalidPrimaryContact,

    #[error("Lead id is malformed")]
    InvalidLeadId,

    #[error("Country is required")]
    MissingCountry,
}

impl ValidationError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCompanyName => "missing_company_name",
            Self::MissingOwner => "missing_owner",
            Self::InvalidPrimaryContact => "invalid_primary_contact",
            Self::InvalidLeadId => "invalid_lead_id",
            Self::MissingCountry => "missing_country",
        }
    }
}

/// Return the first rule the draft breaks, or `None` when it can be sent
pub fn validate(draft: &LeadDraft) -> Option<ValidationError> {
    if draft.company_name().trim().is_empty() {
        return Some(ValidationError::MissingCompanyName);
    }

    if !draft.business_profile().has_owner() {
        return Some(ValidationError::MissingOwner);
    }

    let contacts = draft.contacts();
    let primary_ok = contacts.primary_count() == 1
        && contacts.primary().is_some_and(|c| c.has_name_and_email());
    if !primary_ok {
        return Some(ValidationError::InvalidPrimaryContact);
    }

    if !draft.lead_id().is_well_formed() {
        return Some(ValidationError::InvalidLeadId);
    }

    if !draft.address().has_country() {
        return Some(ValidationError::MissingCountry);
    }

    None
}

/// [`validate`] as a `Result`
pub fn ensure_valid(draft: &LeadDraft) -> Result<(), ValidationError> {
    match validate(draft) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
