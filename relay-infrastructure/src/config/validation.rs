use anyhow::{anyhow, Result};
use reqwest::header::HeaderName;
use reqwest::Url;

pub fn validate_http_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value.trim()).map_err(|err| anyhow!("invalid {}: {}", name, err))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("{} must be an http(s) url", name));
    }
    Ok(())
}

pub fn validate_ws_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value.trim()).map_err(|err| anyhow!("invalid {}: {}", name, err))?;
    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(anyhow!("{} must be a ws(s) url", name));
    }
    Ok(())
}

pub fn validate_header_name(name: &str, value: &str) -> Result<()> {
    HeaderName::from_bytes(value.trim().as_bytes())
        .map(|_| ())
        .map_err(|err| anyhow!("invalid {}: {}", name, err))
}
