// Event entities
// ParsedEvent is the extractor output, EventPayload is what goes on the wire

use serde::{Deserialize, Serialize};

use crate::entities::{PlayerRecord, RawMessage};
use crate::value_objects::EventType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub joined_text: String,
    pub players: Vec<PlayerRecord>,
    pub time_of_death: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    pub event_type: EventType,
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub message_id: String,
    pub time_of_death: String,
    pub players: Vec<PlayerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub killer: Option<PlayerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victim: Option<PlayerRecord>,
}

impl EventPayload {
    /// Shapes the outbound death log. Killer and victim are only assigned
    /// when exactly two players were found: first is the killer, second the
    /// victim.
    pub fn from_parsed(message: &RawMessage, parsed: ParsedEvent) -> Self {
        let (killer, victim) = match parsed.players.as_slice() {
            [killer, victim] => (Some(killer.clone()), Some(victim.clone())),
            _ => (None, None),
        };
        Self {
            event_type: EventType::DeathLog,
            guild_id: message.guild_id.map(|id| id.to_string()),
            channel_id: message.channel_id.to_string(),
            message_id: message.id.to_string(),
            time_of_death: parsed.time_of_death,
            players: parsed.players,
            killer,
            victim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn message(guild_id: Option<u64>) -> RawMessage {
        RawMessage {
            id: 789,
            channel_id: 456,
            guild_id,
            author_id: 1,
            content: None,
            embeds: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn parsed(count: usize) -> ParsedEvent {
        ParsedEvent {
            joined_text: "text".to_string(),
            players: (0..count)
                .map(|idx| PlayerRecord::new(format!("{:032x}", idx), format!("player {}", idx)))
                .collect(),
            time_of_death: "13:45".to_string(),
        }
    }

    #[test]
    fn two_players_assign_killer_and_victim() {
        let payload = EventPayload::from_parsed(&message(Some(123)), parsed(2));
        assert_eq!(payload.killer.as_ref(), Some(&payload.players[0]));
        assert_eq!(payload.victim.as_ref(), Some(&payload.players[1]));
    }

    #[test]
    fn other_player_counts_omit_roles() {
        for count in [1, 3] {
            let payload = EventPayload::from_parsed(&message(Some(123)), parsed(count));
            assert!(payload.killer.is_none());
            assert!(payload.victim.is_none());
            let value = serde_json::to_value(&payload).expect("serialize");
            assert!(value.get("killer").is_none());
            assert!(value.get("victim").is_none());
        }
    }

    #[test]
    fn payload_serializes_wire_shape() {
        let payload = EventPayload::from_parsed(&message(None), parsed(1));
        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(
            value,
            json!({
                "event_type": "DEATH_LOG",
                "guild_id": null,
                "channel_id": "456",
                "message_id": "789",
                "time_of_death": "13:45",
                "players": [
                    {"license": "00000000000000000000000000000000", "player_details": "player 0"}
                ]
            })
        );
    }
}
