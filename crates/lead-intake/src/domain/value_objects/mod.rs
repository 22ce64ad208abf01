//! Value Objects module
//!
//! Immutable, validated domain primitives.

pub mod address;
pub mod deal_value;
pub mod lead_id;

pub use address::{Address, AddressField, UnknownField};
pub use deal_value::DealValue;
pub use lead_id::{normalize_prefix, LeadId, LeadIdError, DEFAULT_LEAD_PREFIX};

/// Identifier for a contact row within a draft
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ContactId(String);

impl ContactId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContactId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
