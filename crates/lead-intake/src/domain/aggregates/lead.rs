//! Lead Draft Aggregate
//!
//! In-memory record edited by the intake form until it is submitted.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::aggregates::contact::{ContactError, ContactField, ContactList};
use crate::domain::value_objects::{Address, AddressField, DealValue, LeadId, UnknownField};

/// Lead draft aggregate root
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeadDraft {
    lead_id: LeadId,
    company_name: String,
    website: Option<String>,
    description: Option<String>,
    expected_deal_value: DealValue,
    lead_status: LeadStatus,
    address: Address,
    business_profile: BusinessProfile,
    contacts: ContactList,
    qualification: Qualification,
}

impl LeadDraft {
    /// Create a fresh draft; the lead id is generated here and never again
    pub fn new<Tz>(prefix: &str, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self::with_lead_id(LeadId::generate(prefix, now))
    }

    /// Create a draft around an existing identifier
    pub fn with_lead_id(lead_id: LeadId) -> Self {
        Self {
            lead_id,
            company_name: String::new(),
            website: None,
            description: None,
            expected_deal_value: DealValue::ZERO,
            lead_status: LeadStatus::default(),
            address: Address::default(),
            business_profile: BusinessProfile::default(),
            contacts: ContactList::new(),
            qualification: Qualification::default(),
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn lead_id(&self) -> &LeadId { &self.lead_id }
    pub fn company_name(&self) -> &str { &self.company_name }
    pub fn website(&self) -> Option<&str> { self.website.as_deref() }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn expected_deal_value(&self) -> DealValue { self.expected_deal_value }
    pub fn lead_status(&self) -> LeadStatus { self.lead_status }
    pub fn address(&self) -> &Address { &self.address }
    pub fn business_profile(&self) -> &BusinessProfile { &self.business_profile }
    pub fn contacts(&self) -> &ContactList { &self.contacts }
    pub fn qualification(&self) -> &Qualification { &self.qualification }

    // =========================================================================
    // Section mutators
    // =========================================================================

    /// Set one of the basic lead fields.
    ///
    /// `ExpectedDealValue` is coerced (non-numeric input becomes 0, negatives
    /// clamp to 0); `LeadStatus` must name a known status.
    pub fn set_basic(&mut self, field: BasicField, value: impl Into<String>) -> Result<(), DraftError> {
        let value = value.into();
        match field {
            BasicField::CompanyName => self.company_name = value,
            BasicField::Website => self.website = non_empty(value),
            BasicField::Description => self.description = non_empty(value),
            BasicField::ExpectedDealValue => self.expected_deal_value = DealValue::coerce(&value),
            BasicField::LeadStatus => self.lead_status = value.parse()?,
        }
        Ok(())
    }

    pub fn set_address(&mut self, field: AddressField, value: impl Into<String>) {
        self.address.set(field, value);
    }

    pub fn set_business(&mut self, field: BusinessField, value: impl Into<String>) {
        self.business_profile.set(field, value.into());
    }

    pub fn set_qualification(&mut self, update: QualificationUpdate) {
        self.qualification.apply(update);
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    pub fn add_contact(&mut self) -> usize {
        self.contacts.add_contact()
    }

    pub fn remove_contact(&mut self, index: usize) -> Result<(), DraftError> {
        self.contacts.remove_contact(index)?;
        Ok(())
    }

    pub fn set_primary_contact(&mut self, index: usize) -> Result<(), DraftError> {
        Ok(self.contacts.set_primary(index)?)
    }

    pub fn update_contact(
        &mut self,
        index: usize,
        field: ContactField,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        Ok(self.contacts.update_field(index, field, value)?)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

// =============================================================================
// Supporting Types
// =============================================================================

/// Top-level fields of the "basic info" section
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicField {
    CompanyName,
    Website,
    Description,
    ExpectedDealValue,
    LeadStatus,
}

impl FromStr for BasicField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "company_name" | "company" => Ok(Self::CompanyName),
            "website" => Ok(Self::Website),
            "description" => Ok(Self::Description),
            "expected_deal_value" | "deal_value" => Ok(Self::ExpectedDealValue),
            "lead_status" | "status" => Ok(Self::LeadStatus),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Imported,
    #[default]
    New,
    Contacted,
    Qualified,
    ProposalSent,
    Won,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imported => "imported",
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::ProposalSent => "proposal_sent",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "imported" => Ok(Self::Imported),
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "qualified" => Ok(Self::Qualified),
            "proposal_sent" => Ok(Self::ProposalSent),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            _ => Err(DraftError::UnknownLeadStatus(s.to_string())),
        }
    }
}

/// Lead source used when the form leaves it untouched
pub const DEFAULT_LEAD_SOURCE: &str = "inbound";

/// Business profile section
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BusinessProfile {
    pub industry: String,
    pub employees: String,
    pub annual_revenue: String,
    pub lead_source: String,
    /// Owner of record
    pub assigned_to: String,
}

impl BusinessProfile {
    fn set(&mut self, field: BusinessField, value: String) {
        match field {
            BusinessField::Industry => self.industry = value,
            BusinessField::Employees => self.employees = value,
            BusinessField::AnnualRevenue => self.annual_revenue = value,
            BusinessField::LeadSource => self.lead_source = value,
            BusinessField::AssignedTo => self.assigned_to = value,
        }
    }

    pub fn has_owner(&self) -> bool {
        !self.assigned_to.trim().is_empty()
    }
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            industry: String::new(),
            employees: String::new(),
            annual_revenue: String::new(),
            lead_source: DEFAULT_LEAD_SOURCE.to_string(),
            assigned_to: String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessField {
    Industry,
    Employees,
    AnnualRevenue,
    LeadSource,
    AssignedTo,
}

impl FromStr for BusinessField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "industry" => Ok(Self::Industry),
            "employees" => Ok(Self::Employees),
            "annual_revenue" | "revenue" => Ok(Self::AnnualRevenue),
            "lead_source" | "source" => Ok(Self::LeadSource),
            "assigned_to" | "owner" => Ok(Self::AssignedTo),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetMentioned {
    Yes,
    No,
    #[default]
    Unknown,
}

impl BudgetMentioned {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for BudgetMentioned {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(Self::Yes),
            "no" | "n" | "false" => Ok(Self::No),
            "unknown" | "" => Ok(Self::Unknown),
            _ => Err(DraftError::UnknownBudgetAnswer(s.to_string())),
        }
    }
}

/// Sales-readiness signals
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Qualification {
    pub problem_identified: bool,
    pub budget_mentioned: BudgetMentioned,
    pub authority_known: bool,
    pub need_timeline: bool,
    pub expected_timeline: String,
    pub notes: Option<String>,
}

impl Qualification {
    fn apply(&mut self, update: QualificationUpdate) {
        match update {
            QualificationUpdate::ProblemIdentified(v) => self.problem_identified = v,
            QualificationUpdate::BudgetMentioned(v) => self.budget_mentioned = v,
            QualificationUpdate::AuthorityKnown(v) => self.authority_known = v,
            QualificationUpdate::NeedTimeline(v) => self.need_timeline = v,
            QualificationUpdate::ExpectedTimeline(v) => self.expected_timeline = v,
            QualificationUpdate::Notes(v) => self.notes = non_empty(v),
        }
    }
}

/// One change to the qualification section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "field", content = "value")]
pub enum QualificationUpdate {
    ProblemIdentified(bool),
    BudgetMentioned(BudgetMentioned),
    AuthorityKnown(bool),
    NeedTimeline(bool),
    ExpectedTimeline(String),
    Notes(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Unknown lead status: {0}")]
    UnknownLeadStatus(String),

    #[error("Unknown budget answer: {0} (expected yes, no or unknown)")]
    UnknownBudgetAnswer(String),

    #[error(transparent)]
    Contact(#[from] ContactError),
}
