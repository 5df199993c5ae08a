use async_trait::async_trait;

use crate::entities::EventPayload;

/// Result of a single best-effort delivery. Failures are values, not errors,
/// so callers decide how to log or count them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { status: u16 },
    Rejected { status: u16, body: String },
    TransportError(String),
}

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Sends the payload exactly once. Never retries.
    async fn deliver(&self, payload: &EventPayload) -> DeliveryOutcome;
}
