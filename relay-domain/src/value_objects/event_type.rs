// Event type value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "DEATH_LOG")]
    DeathLog,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::DeathLog => "DEATH_LOG",
        }
    }
}
