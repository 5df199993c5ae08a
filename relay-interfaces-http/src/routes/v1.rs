use axum::Router;

use relay_application::AppState;

use crate::handlers::ops_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use relay_application::Metrics;
    use relay_domain::ports::EventSink;
    use relay_domain::{DeliveryOutcome, EventPayload, RuntimeConfig};
    use tokio::net::TcpListener;

    struct NoopSink;

    #[async_trait]
    impl EventSink for NoopSink {
        async fn deliver(&self, _payload: &EventPayload) -> DeliveryOutcome {
            DeliveryOutcome::Delivered { status: 200 }
        }
    }

    fn state(ops_token: Option<&str>) -> AppState {
        AppState {
            config: Arc::new(RuntimeConfig {
                bind_addr: "127.0.0.1:0".to_string(),
                ops_token: ops_token.map(ToString::to_string),
                target_author_id: 1,
                log_channel_id: 2,
                api_url: "http://127.0.0.1:8000/logs".to_string(),
                api_secret: "secret".to_string(),
                api_secret_header: "X-Discord-Secret".to_string(),
                request_timeout_seconds: 15,
            }),
            event_sink: Arc::new(NoopSink),
            metrics: Arc::new(Metrics::default()),
        }
    }

    async fn serve(state: AppState) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = build_router(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn readiness_follows_gateway_state() {
        let state = state(None);
        let base = serve(state.clone()).await;
        let client = reqwest::Client::new();

        let live = client
            .get(format!("{}/v1/ops/health/live", base))
            .send()
            .await
            .expect("live");
        assert_eq!(live.status().as_u16(), 200);

        let ready = client
            .get(format!("{}/v1/ops/health/ready", base))
            .send()
            .await
            .expect("ready");
        assert_eq!(ready.status().as_u16(), 503);

        state.metrics.set_gateway_connected(true);
        let ready = client
            .get(format!("{}/v1/ops/health/ready", base))
            .send()
            .await
            .expect("ready");
        assert_eq!(ready.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn metrics_require_ops_token_when_configured() {
        let state = state(Some("ops"));
        state.metrics.record_message();
        let base = serve(state).await;
        let client = reqwest::Client::new();
        let url = format!("{}/v1/ops/metrics/prometheus", base);

        let denied = client.get(&url).send().await.expect("metrics");
        assert_eq!(denied.status().as_u16(), 401);

        let allowed = client
            .get(&url)
            .bearer_auth("ops")
            .send()
            .await
            .expect("metrics");
        assert_eq!(allowed.status().as_u16(), 200);
        let body = allowed.text().await.expect("body");
        assert!(body.contains("deathlog_messages_received_total 1\n"));
    }
}
