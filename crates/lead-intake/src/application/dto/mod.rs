//! Data Transfer Objects (DTOs)
//!
//! The flat wire payload sent to the lead service and the interpretation of
//! its response.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::aggregates::{BudgetMentioned, LeadDraft, LeadStatus, DEFAULT_LEAD_SOURCE};
use crate::error::{IntakeError, GENERIC_FAILURE_MESSAGE};

// =============================================================================
// Request
// =============================================================================

/// Body of `POST /api/commerce/workflow/revenue/leads`.
///
/// Flat by contract even though the draft is sectioned. Contact fields come
/// from the primary contact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeadPayload {
    pub lead_id: String,
    pub company_name: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub lead_status: LeadStatus,
    pub country: String,
    pub industry: Option<String>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub lead_source: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_deal_value: Decimal,
    pub expected_timeline: String,
    pub owner_id: Option<String>,
    pub problem_identified: bool,
    pub budget_mentioned: BudgetMentioned,
    pub authority_known: bool,
    pub need_timeline: bool,
    pub notes: String,
}

impl LeadPayload {
    /// Flatten a draft. Text is trimmed and blank optionals become `null`.
    pub fn from_draft(draft: &LeadDraft) -> Self {
        let primary = draft.contacts().primary();
        let profile = draft.business_profile();
        let qualification = draft.qualification();

        let lead_source = match profile.lead_source.trim() {
            "" => DEFAULT_LEAD_SOURCE.to_string(),
            source => source.to_string(),
        };

        Self {
            lead_id: draft.lead_id().to_string(),
            company_name: draft.company_name().trim().to_string(),
            website: optional(draft.website()),
            description: optional(draft.description()),
            lead_status: draft.lead_status(),
            country: draft.address().country.trim().to_string(),
            industry: optional(Some(profile.industry.as_str())),
            contact_name: primary.map(|c| c.full_name().trim().to_string()).unwrap_or_default(),
            contact_email: primary.map(|c| c.email().trim().to_string()).unwrap_or_default(),
            contact_phone: optional(primary.and_then(|c| c.phone())),
            lead_source,
            estimated_deal_value: draft.expected_deal_value().amount(),
            expected_timeline: qualification.expected_timeline.trim().to_string(),
            owner_id: optional(Some(profile.assigned_to.as_str())),
            problem_identified: qualification.problem_identified,
            budget_mentioned: qualification.budget_mentioned,
            authority_known: qualification.authority_known,
            need_timeline: qualification.need_timeline,
            notes: qualification.notes.as_deref().unwrap_or_default().trim().to_string(),
        }
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

// =============================================================================
// Response
// =============================================================================

/// Confirmation that the backend stored the lead
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadCreated {
    /// Client-generated lead id that was submitted
    pub lead_id: String,
    /// Identifier assigned by the backend, when it returns one
    pub record_id: Option<String>,
    pub message: Option<String>,
}

/// Turn an HTTP status and raw body into the submission outcome.
///
/// Success needs both a 2xx status and a truthy `success` field. On failure
/// the message is taken from `detail.message`, `detail`, then `message`.
pub fn interpret_response(lead_id: &str, status: u16, body: &str) -> Result<LeadCreated, IntakeError> {
    let json: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let accepted = (200..300).contains(&status) && json.get("success").is_some_and(is_truthy);

    if accepted {
        return Ok(LeadCreated {
            lead_id: lead_id.to_string(),
            record_id: record_id(&json),
            message: non_empty_str(json.get("message")),
        });
    }

    let message = failure_message(&json).unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
    match status {
        401 | 403 => Err(IntakeError::Auth(message)),
        _ => Err(IntakeError::ServerRejection { status: Some(status), message }),
    }
}

fn failure_message(json: &Value) -> Option<String> {
    if let Some(detail) = json.get("detail") {
        if let Some(message) = non_empty_str(detail.get("message")) {
            return Some(message);
        }
        if let Some(message) = non_empty_str(Some(detail)) {
            return Some(message);
        }
    }
    non_empty_str(json.get("message"))
}

fn record_id(json: &Value) -> Option<String> {
    let data = json.get("data");
    [
        data.and_then(|d| d.get("id")),
        data.and_then(|d| d.get("lead_id")),
        json.get("id"),
    ]
    .into_iter()
    .flatten()
    .find_map(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// JSON truthiness: `false`, `null`, `0`, `""` are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
