//! Domain Events
//!
//! Broadcast signals raised once a lead has been accepted by the backend.

use serde::Serialize;

/// Events in the lead intake bounded context
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LeadEvent {
    /// The set of leads changed; listing views should refresh. Carries no
    /// payload.
    LeadsChanged,
}

impl LeadEvent {
    /// Topic name subscribers filter on
    pub fn topic(&self) -> &'static str {
        match self {
            LeadEvent::LeadsChanged => "leads.changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic() {
        assert_eq!(LeadEvent::LeadsChanged.topic(), "leads.changed");
    }
}
