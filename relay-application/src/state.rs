use std::sync::Arc;

use relay_domain::ports::EventSink;
use relay_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RuntimeConfig>,
    pub event_sink: Arc<dyn EventSink>,
    pub metrics: Arc<Metrics>,
}
