use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use relay_application::{AppState, Metrics};
use relay_domain::GatewayConfig;
use relay_infrastructure::{AppConfig, HttpEventSink};

pub struct AppContext {
    pub state: AppState,
    pub gateway: GatewayConfig,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config()?;
        let gateway = config.to_gateway_config()?;
        info!(
            target_author_id = runtime_config.target_author_id,
            log_channel_id = runtime_config.log_channel_id,
            api_url = %runtime_config.api_url,
            api_secret_header = %runtime_config.api_secret_header,
            ops_token_set = runtime_config.ops_token.is_some(),
            "config loaded"
        );

        let event_sink = Arc::new(HttpEventSink::new(&runtime_config)?);
        let state = AppState {
            config: Arc::new(runtime_config),
            event_sink,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state, gateway })
    }
}
