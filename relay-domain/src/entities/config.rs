// Runtime configuration entities
// Immutable once loaded; passed explicitly into the pipeline

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub ops_token: Option<String>,
    pub target_author_id: u64,
    pub log_channel_id: u64,
    pub api_url: String,
    pub api_secret: String,
    pub api_secret_header: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub token: String,
    pub gateway_url: String,
    pub intents: u64,
    pub reconnect_delay_seconds: u64,
}
