// Player entity
// One participant of a death log, paired by position from the message text

use serde::{Deserialize, Serialize};

pub const UNKNOWN_PLAYER_DETAILS: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub license: String,
    pub player_details: String,
}

impl PlayerRecord {
    pub fn new(license: impl Into<String>, player_details: impl Into<String>) -> Self {
        Self {
            license: license.into(),
            player_details: player_details.into(),
        }
    }

    pub fn with_unknown_details(license: impl Into<String>) -> Self {
        Self::new(license, UNKNOWN_PLAYER_DETAILS)
    }
}
