use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Client;

use relay_domain::ports::EventSink;
use relay_domain::{DeliveryOutcome, EventPayload, RuntimeConfig};

/// Posts death logs to the collector API. Holds one client for the lifetime
/// of the process.
pub struct HttpEventSink {
    client: Client,
    url: String,
    secret_header: HeaderName,
    secret: HeaderValue,
}

impl HttpEventSink {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()?;
        let secret_header = HeaderName::from_bytes(config.api_secret_header.as_bytes())?;
        let mut secret = HeaderValue::from_str(&config.api_secret)?;
        secret.set_sensitive(true);

        Ok(Self {
            client,
            url: config.api_url.clone(),
            secret_header,
            secret,
        })
    }
}

#[async_trait]
impl EventSink for HttpEventSink {
    async fn deliver(&self, payload: &EventPayload) -> DeliveryOutcome {
        let response = match self
            .client
            .post(&self.url)
            .header(self.secret_header.clone(), self.secret.clone())
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return DeliveryOutcome::TransportError(err.to_string()),
        };

        let status = response.status().as_u16();
        if matches!(status, 200 | 201) {
            return DeliveryOutcome::Delivered { status };
        }
        let body = response.text().await.unwrap_or_default();
        DeliveryOutcome::Rejected { status, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::{TimeZone, Utc};
    use relay_domain::{ParsedEvent, PlayerRecord, RawMessage};
    use serde_json::Value;
    use tokio::net::TcpListener;

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    async fn spawn_api(status: StatusCode) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let app = Router::new().route(
            "/logs",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    let secret = headers
                        .get("x-discord-secret")
                        .and_then(|value| value.to_str().ok())
                        .map(ToString::to_string);
                    captured.lock().expect("seen lock").push((secret, body));
                    (status, "api says no")
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{}/logs", addr), seen)
    }

    fn config(api_url: String) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: "127.0.0.1:3235".to_string(),
            ops_token: None,
            target_author_id: 1,
            log_channel_id: 2,
            api_url,
            api_secret: "shared-secret".to_string(),
            api_secret_header: "X-Discord-Secret".to_string(),
            request_timeout_seconds: 5,
        }
    }

    fn payload() -> EventPayload {
        let message = RawMessage {
            id: 789,
            channel_id: 456,
            guild_id: Some(123),
            author_id: 1,
            content: None,
            embeds: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let parsed = ParsedEvent {
            joined_text: "text".to_string(),
            players: vec![
                PlayerRecord::new("a".repeat(32), "John Doe"),
                PlayerRecord::new("b".repeat(32), "Jane Roe"),
            ],
            time_of_death: "14:30".to_string(),
        };
        EventPayload::from_parsed(&message, parsed)
    }

    #[tokio::test]
    async fn created_response_counts_as_delivered() {
        let (url, seen) = spawn_api(StatusCode::CREATED).await;
        let sink = HttpEventSink::new(&config(url)).expect("sink");

        let outcome = sink.deliver(&payload()).await;
        assert_eq!(outcome, DeliveryOutcome::Delivered { status: 201 });

        let seen = seen.lock().expect("seen lock");
        assert_eq!(seen.len(), 1);
        let (secret, body) = &seen[0];
        assert_eq!(secret.as_deref(), Some("shared-secret"));
        assert_eq!(body["event_type"], "DEATH_LOG");
        assert_eq!(body["guild_id"], "123");
        assert_eq!(body["killer"]["player_details"], "John Doe");
        assert_eq!(body["victim"]["player_details"], "Jane Roe");
    }

    #[tokio::test]
    async fn other_statuses_are_rejections_with_body() {
        for status in [StatusCode::NO_CONTENT, StatusCode::INTERNAL_SERVER_ERROR] {
            let (url, _) = spawn_api(status).await;
            let sink = HttpEventSink::new(&config(url)).expect("sink");
            match sink.deliver(&payload()).await {
                DeliveryOutcome::Rejected { status: got, .. } => assert_eq!(got, status.as_u16()),
                other => panic!("unexpected outcome: {:?}", other),
            }
        }

        let (url, _) = spawn_api(StatusCode::FORBIDDEN).await;
        let sink = HttpEventSink::new(&config(url)).expect("sink");
        assert_eq!(
            sink.deliver(&payload()).await,
            DeliveryOutcome::Rejected {
                status: 403,
                body: "api says no".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn unreachable_api_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let sink = HttpEventSink::new(&config(format!("http://{}/logs", addr))).expect("sink");
        assert!(matches!(
            sink.deliver(&payload()).await,
            DeliveryOutcome::TransportError(_)
        ));
    }

    #[test]
    fn invalid_secret_header_is_rejected() {
        let mut config = config("http://127.0.0.1:1/logs".to_string());
        config.api_secret_header = "bad header".to_string();
        assert!(HttpEventSink::new(&config).is_err());
    }
}
