use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use relay_application::{process_message, AppState};
use relay_domain::{Embed, EmbedField, GatewayConfig, RawMessage, Snowflake};

type GatewayStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

const OP_DISPATCH: u8 = 0;
const OP_HEARTBEAT: u8 = 1;
const OP_IDENTIFY: u8 = 2;
const OP_RECONNECT: u8 = 7;
const OP_INVALID_SESSION: u8 = 9;
const OP_HELLO: u8 = 10;
const OP_HEARTBEAT_ACK: u8 = 11;

const CLIENT_NAME: &str = "deathlog-relay";

#[derive(Debug, Error)]
enum GatewayError {
    #[error("session closed with fatal code {0}: {1}")]
    Fatal(u16, String),
    #[error("gateway requested reconnect")]
    Reconnect,
    #[error("session invalidated")]
    InvalidSession,
    #[error("heartbeat not acknowledged")]
    Zombie,
    #[error("expected hello, got op {0}")]
    NoHello(u8),
    #[error("ws closed by peer: {0}")]
    Closed(String),
    #[error("ws stream ended")]
    Ended,
    #[error("ws stream error: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("malformed gateway payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct GatewayPayload {
    op: u8,
    #[serde(default)]
    d: Option<Value>,
    #[serde(default)]
    s: Option<u64>,
    #[serde(default)]
    t: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Hello {
    heartbeat_interval: u64,
}

/// Keeps a gateway session open for the life of the process, reconnecting
/// after any non-fatal failure. The task only finishes on a fatal close code.
pub fn spawn_discord_bridge(state: AppState, gateway: GatewayConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match tokio_tungstenite::connect_async(gateway.gateway_url.as_str()).await {
                Ok((mut ws, _)) => {
                    info!("discord gateway connected: url={}", gateway.gateway_url);
                    let result = run_session(&state, &gateway, &mut ws).await;
                    state.metrics.set_gateway_connected(false);
                    match result {
                        Err(GatewayError::Fatal(code, reason)) => {
                            error!(
                                "discord gateway refused session: code={}, reason={}",
                                code, reason
                            );
                            return;
                        }
                        Err(err) => warn!("discord gateway session ended: {}", err),
                        Ok(()) => {}
                    }
                }
                Err(err) => {
                    warn!(
                        "discord gateway connect failed: url={}, err={}",
                        gateway.gateway_url, err
                    );
                }
            }
            sleep(Duration::from_secs(gateway.reconnect_delay_seconds)).await;
        }
    })
}

async fn run_session(
    state: &AppState,
    gateway: &GatewayConfig,
    ws: &mut GatewayStream,
) -> Result<(), GatewayError> {
    let period = Duration::from_millis(await_hello(ws).await?.max(1));
    ws.send(Message::Text(identify_payload(gateway))).await?;

    let mut heartbeat = interval_at(Instant::now() + period, period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sequence: Option<u64> = None;
    let mut acked = true;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if !acked {
                    return Err(GatewayError::Zombie);
                }
                ws.send(Message::Text(heartbeat_payload(sequence))).await?;
                acked = false;
            }
            next = ws.next() => {
                let frame = match next {
                    Some(frame) => frame?,
                    None => return Err(GatewayError::Ended),
                };
                match frame {
                    Message::Text(text) => {
                        let payload: GatewayPayload = match serde_json::from_str(&text) {
                            Ok(payload) => payload,
                            Err(err) => {
                                warn!("skipping malformed gateway payload: {}", err);
                                continue;
                            }
                        };
                        if payload.s.is_some() {
                            sequence = payload.s;
                        }
                        match payload.op {
                            OP_DISPATCH => handle_dispatch(state, payload.t.as_deref(), payload.d),
                            OP_HEARTBEAT => {
                                ws.send(Message::Text(heartbeat_payload(sequence))).await?;
                            }
                            OP_HEARTBEAT_ACK => acked = true,
                            OP_RECONNECT => return Err(GatewayError::Reconnect),
                            OP_INVALID_SESSION => return Err(GatewayError::InvalidSession),
                            other => debug!("ignoring gateway op {}", other),
                        }
                    }
                    Message::Ping(bytes) => {
                        ws.send(Message::Pong(bytes)).await?;
                    }
                    Message::Close(frame) => return Err(close_error(frame)),
                    _ => {}
                }
            }
        }
    }
}

async fn await_hello(ws: &mut GatewayStream) -> Result<u64, GatewayError> {
    while let Some(next) = ws.next().await {
        match next? {
            Message::Text(text) => {
                let payload: GatewayPayload = serde_json::from_str(&text)?;
                if payload.op != OP_HELLO {
                    return Err(GatewayError::NoHello(payload.op));
                }
                let hello: Hello = serde_json::from_value(payload.d.unwrap_or(Value::Null))?;
                return Ok(hello.heartbeat_interval);
            }
            Message::Close(frame) => return Err(close_error(frame)),
            _ => {}
        }
    }
    Err(GatewayError::Ended)
}

fn handle_dispatch(state: &AppState, event: Option<&str>, data: Option<Value>) {
    match event {
        Some("READY") => {
            state.metrics.set_gateway_connected(true);
            let user = data
                .as_ref()
                .and_then(|d| d.get("user"))
                .and_then(|user| user.get("username"))
                .and_then(Value::as_str)
                .unwrap_or("<unknown>");
            info!("discord gateway ready: user={}", user);
        }
        Some("MESSAGE_CREATE") => {
            let Some(message) = data.and_then(parse_message_create) else {
                warn!("skipping malformed MESSAGE_CREATE dispatch");
                return;
            };
            let state = state.clone();
            tokio::spawn(async move {
                process_message(&state, &message).await;
            });
        }
        _ => {}
    }
}

fn identify_payload(gateway: &GatewayConfig) -> String {
    json!({
        "op": OP_IDENTIFY,
        "d": {
            "token": gateway.token,
            "intents": gateway.intents,
            "properties": {
                "os": std::env::consts::OS,
                "browser": CLIENT_NAME,
                "device": CLIENT_NAME,
            },
        },
    })
    .to_string()
}

fn heartbeat_payload(sequence: Option<u64>) -> String {
    json!({ "op": OP_HEARTBEAT, "d": sequence }).to_string()
}

fn close_error(frame: Option<CloseFrame<'_>>) -> GatewayError {
    let Some(frame) = frame else {
        return GatewayError::Closed("no close frame".to_string());
    };
    let code = u16::from(frame.code);
    if is_fatal_close_code(code) {
        GatewayError::Fatal(code, frame.reason.to_string())
    } else {
        GatewayError::Closed(format!("{} {}", code, frame.reason))
    }
}

// Bad token, bad shard or intents setup. Reconnecting cannot fix these.
fn is_fatal_close_code(code: u16) -> bool {
    matches!(code, 4004 | 4010..=4014)
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    id: String,
    channel_id: String,
    #[serde(default)]
    guild_id: Option<String>,
    author: WireUser,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    embeds: Vec<WireEmbed>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct WireEmbed {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    fields: Vec<WireEmbedField>,
    #[serde(default)]
    footer: Option<WireEmbedFooter>,
    #[serde(default)]
    author: Option<WireEmbedAuthor>,
}

#[derive(Debug, Deserialize)]
struct WireEmbedField {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct WireEmbedFooter {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct WireEmbedAuthor {
    #[serde(default)]
    name: String,
}

impl From<WireEmbed> for Embed {
    fn from(embed: WireEmbed) -> Self {
        Self {
            title: embed.title,
            description: embed.description,
            fields: embed
                .fields
                .into_iter()
                .map(|field| EmbedField {
                    name: field.name,
                    value: field.value,
                })
                .collect(),
            footer: embed.footer.map(|footer| footer.text),
            author: embed.author.map(|author| author.name),
        }
    }
}

fn parse_message_create(data: Value) -> Option<RawMessage> {
    let wire: WireMessage = serde_json::from_value(data).ok()?;
    let id = Snowflake::parse(&wire.id)?;
    let channel_id = Snowflake::parse(&wire.channel_id)?;
    let author_id = Snowflake::parse(&wire.author.id)?;
    let guild_id = wire.guild_id.as_deref().and_then(Snowflake::parse);

    Some(RawMessage {
        id: id.0,
        channel_id: channel_id.0,
        guild_id: guild_id.map(|guild| guild.0),
        author_id: author_id.0,
        content: wire.content.filter(|text| !text.is_empty()),
        embeds: wire.embeds.into_iter().map(Embed::from).collect(),
        created_at: id.created_at(),
    })
}
