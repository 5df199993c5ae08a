use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use relay_domain::DeliveryOutcome;

#[derive(Debug, Default)]
pub struct Metrics {
    messages_received: AtomicU64,
    messages_filtered: AtomicU64,
    messages_ineligible: AtomicU64,
    deliveries_succeeded: AtomicU64,
    deliveries_rejected: AtomicU64,
    deliveries_failed: AtomicU64,
    gateway_connected: AtomicBool,
}

impl Metrics {
    pub fn record_message(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filtered(&self) {
        self.messages_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ineligible(&self) {
        self.messages_ineligible.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivery(&self, outcome: &DeliveryOutcome) {
        let counter = match outcome {
            DeliveryOutcome::Delivered { .. } => &self.deliveries_succeeded,
            DeliveryOutcome::Rejected { .. } => &self.deliveries_rejected,
            DeliveryOutcome::TransportError(_) => &self.deliveries_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_gateway_connected(&self, connected: bool) {
        self.gateway_connected.store(connected, Ordering::Relaxed);
    }

    pub fn gateway_connected(&self) -> bool {
        self.gateway_connected.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let received = self.messages_received.load(Ordering::Relaxed);
        let filtered = self.messages_filtered.load(Ordering::Relaxed);
        let ineligible = self.messages_ineligible.load(Ordering::Relaxed);
        let succeeded = self.deliveries_succeeded.load(Ordering::Relaxed);
        let rejected = self.deliveries_rejected.load(Ordering::Relaxed);
        let failed = self.deliveries_failed.load(Ordering::Relaxed);
        let connected = u8::from(self.gateway_connected());

        format!(
            "# TYPE deathlog_messages_received_total counter\n\
deathlog_messages_received_total {}\n\
# TYPE deathlog_messages_filtered_total counter\n\
deathlog_messages_filtered_total {}\n\
# TYPE deathlog_messages_ineligible_total counter\n\
deathlog_messages_ineligible_total {}\n\
# TYPE deathlog_deliveries_succeeded_total counter\n\
deathlog_deliveries_succeeded_total {}\n\
# TYPE deathlog_deliveries_rejected_total counter\n\
deathlog_deliveries_rejected_total {}\n\
# TYPE deathlog_deliveries_failed_total counter\n\
deathlog_deliveries_failed_total {}\n\
# TYPE deathlog_gateway_connected gauge\n\
deathlog_gateway_connected {}\n",
            received, filtered, ineligible, succeeded, rejected, failed, connected
        )
    }
}
