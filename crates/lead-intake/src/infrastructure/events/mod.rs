//! In-process lead event bus

use tokio::sync::broadcast;

use crate::domain::events::LeadEvent;
use crate::ports::outbound::LeadEventPublisher;

const CHANNEL_CAPACITY: usize = 16;

/// Broadcast channel fan-out for [`LeadEvent`]s.
///
/// Listing views call [`subscribe`](Self::subscribe) and refresh on every
/// `LeadsChanged`. Slow subscribers may observe `Lagged`, which for a
/// payload-free signal still means "refresh".
#[derive(Clone, Debug)]
pub struct BroadcastLeadEvents {
    tx: broadcast::Sender<LeadEvent>,
}

impl BroadcastLeadEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LeadEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastLeadEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadEventPublisher for BroadcastLeadEvents {
    fn publish(&self, event: LeadEvent) {
        match self.tx.send(event) {
            Ok(n) => tracing::debug!("Published {} to {} subscriber(s)", event.topic(), n),
            Err(_) => tracing::debug!("Published {} with no subscribers", event.topic()),
        }
    }
}
