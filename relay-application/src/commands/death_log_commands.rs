use tracing::{debug, info, warn};

use relay_domain::{
    check_content, check_origin, extract, DeliveryOutcome, DropReason, EventPayload, RawMessage,
};

use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Not from the target account or not in the log channel.
    Filtered(DropReason),
    /// From the right place but nothing reportable in it.
    Ineligible(DropReason),
    Attempted(DeliveryOutcome),
}

/// Runs one message through extraction, the eligibility gate and a single
/// delivery attempt. Never fails: every end state is reported as an outcome.
pub async fn process_message(state: &AppState, message: &RawMessage) -> MessageOutcome {
    state.metrics.record_message();

    if let Err(reason) = check_origin(&state.config, message) {
        debug!("message {} filtered: {}", message.id, reason);
        state.metrics.record_filtered();
        return MessageOutcome::Filtered(reason);
    }

    let parsed = extract(message);
    debug!("message {} content:\n{}", message.id, parsed.joined_text);

    if let Err(reason) = check_content(&parsed) {
        info!("message {} skipped: {}", message.id, reason);
        state.metrics.record_ineligible();
        return MessageOutcome::Ineligible(reason);
    }

    let payload = EventPayload::from_parsed(message, parsed);
    let outcome = state.event_sink.deliver(&payload).await;
    match &outcome {
        DeliveryOutcome::Delivered { status } => info!(
            "{} delivered: message={}, players={}, status={}",
            payload.event_type.as_str(),
            payload.message_id,
            payload.players.len(),
            status
        ),
        DeliveryOutcome::Rejected { status, body } => warn!(
            "death log rejected by api: message={}, status={}, body={}",
            payload.message_id, status, body
        ),
        DeliveryOutcome::TransportError(err) => warn!(
            "death log delivery failed: message={}, err={}",
            payload.message_id, err
        ),
    }
    state.metrics.record_delivery(&outcome);
    MessageOutcome::Attempted(outcome)
}
