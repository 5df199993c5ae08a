use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use relay_domain::{GatewayConfig, RuntimeConfig};

use crate::config::validation::{validate_header_name, validate_http_url, validate_ws_url};

pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";
// GUILDS | GUILD_MESSAGES | MESSAGE_CONTENT
pub const DEFAULT_GATEWAY_INTENTS: u64 = (1 << 0) | (1 << 9) | (1 << 15);

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub ops_token: Option<String>,
    pub discord_token: Option<String>,
    pub target_author_id: Option<u64>,
    pub log_channel_id: Option<u64>,
    pub api_url: Option<String>,
    pub api_secret: Option<String>,
    pub api_secret_header: String,
    pub request_timeout_seconds: u64,
    pub gateway_url: String,
    pub gateway_intents: u64,
    pub reconnect_delay_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3235".to_string(),
            ops_token: None,
            discord_token: None,
            target_author_id: None,
            log_channel_id: None,
            api_url: None,
            api_secret: None,
            api_secret_header: "X-Discord-Secret".to_string(),
            request_timeout_seconds: 15,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            gateway_intents: DEFAULT_GATEWAY_INTENTS,
            reconnect_delay_seconds: 5,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("DEATHLOG_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::parse(&content)?
        } else {
            warn!("{} not found, using defaults and environment", path);
            AppConfig::default()
        };
        config.apply_env_overrides()?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config file: {}", err))
    }

    pub fn normalize(&mut self) {
        normalize_optional(&mut self.ops_token);
        normalize_optional(&mut self.discord_token);
        normalize_optional(&mut self.api_url);
        normalize_optional(&mut self.api_secret);
        if self.target_author_id == Some(0) {
            self.target_author_id = None;
        }
        if self.log_channel_id == Some(0) {
            self.log_channel_id = None;
        }
        self.api_secret_header = self.api_secret_header.trim().to_string();
        self.gateway_url = self.gateway_url.trim().to_string();
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        required(&self.discord_token, "discord_token")?;
        required(&self.target_author_id, "target_author_id")?;
        required(&self.log_channel_id, "log_channel_id")?;
        required(&self.api_secret, "api_secret")?;
        validate_http_url("api_url", required(&self.api_url, "api_url")?)?;
        validate_header_name("api_secret_header", &self.api_secret_header)?;
        validate_ws_url("gateway_url", &self.gateway_url)?;
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> Result<RuntimeConfig> {
        Ok(RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            ops_token: self.ops_token.clone(),
            target_author_id: *required(&self.target_author_id, "target_author_id")?,
            log_channel_id: *required(&self.log_channel_id, "log_channel_id")?,
            api_url: required(&self.api_url, "api_url")?.clone(),
            api_secret: required(&self.api_secret, "api_secret")?.clone(),
            api_secret_header: self.api_secret_header.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
        })
    }

    pub fn to_gateway_config(&self) -> Result<GatewayConfig> {
        Ok(GatewayConfig {
            token: required(&self.discord_token, "discord_token")?.clone(),
            gateway_url: self.gateway_url.clone(),
            intents: self.gateway_intents,
            reconnect_delay_seconds: self.reconnect_delay_seconds,
        })
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = env::var("DEATHLOG_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("DEATHLOG_OPS_TOKEN") {
            self.ops_token = Some(value);
        }
        if let Ok(value) = env::var("DEATHLOG_DISCORD_TOKEN") {
            self.discord_token = Some(value);
        }
        if let Ok(value) = env::var("DEATHLOG_TARGET_AUTHOR_ID") {
            self.target_author_id = parse_env_id("DEATHLOG_TARGET_AUTHOR_ID", &value)?;
        }
        if let Ok(value) = env::var("DEATHLOG_LOG_CHANNEL_ID") {
            self.log_channel_id = parse_env_id("DEATHLOG_LOG_CHANNEL_ID", &value)?;
        }
        if let Ok(value) = env::var("DEATHLOG_API_URL") {
            self.api_url = Some(value);
        }
        if let Ok(value) = env::var("DEATHLOG_API_SECRET") {
            self.api_secret = Some(value);
        }
        if let Ok(value) = env::var("DEATHLOG_API_SECRET_HEADER") {
            self.api_secret_header = value;
        }
        if let Ok(value) = env::var("DEATHLOG_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("DEATHLOG_GATEWAY_URL") {
            self.gateway_url = value;
        }
        if let Ok(value) = env::var("DEATHLOG_GATEWAY_INTENTS") {
            self.gateway_intents = value.parse().unwrap_or(self.gateway_intents);
        }
        if let Ok(value) = env::var("DEATHLOG_RECONNECT_DELAY_SECONDS") {
            self.reconnect_delay_seconds = value.parse().unwrap_or(self.reconnect_delay_seconds);
        }
        Ok(())
    }
}

// Blank means unset; anything else must be a decimal id.
fn parse_env_id(name: &str, value: &str) -> Result<Option<u64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|err| anyhow!("invalid {}: {:?} ({})", name, value, err))
}

fn normalize_optional(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|raw| raw.trim().is_empty()) {
        *value = None;
    }
}

fn required<'a, T>(value: &'a Option<T>, name: &str) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| anyhow!("{} must be configured", name))
}
