// Identifier value objects

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds between the Unix epoch and the first second of 2015,
/// the epoch Discord snowflakes count from.
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snowflake(pub u64);

impl Snowflake {
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u64>().ok().filter(|id| *id > 0).map(Snowflake)
    }

    /// Creation time encoded in the upper 42 bits of the id.
    pub fn created_at(&self) -> DateTime<Utc> {
        let millis = (self.0 >> 22) as i64 + DISCORD_EPOCH_MS;
        Utc.timestamp_millis_opt(millis)
            .single()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_creation_time() {
        let id = Snowflake::parse("175928847299117063").expect("snowflake");
        assert_eq!(
            id.created_at().to_rfc3339(),
            "2016-04-30T11:18:25.796+00:00"
        );
    }

    #[test]
    fn snowflake_rejects_zero_and_garbage() {
        assert!(Snowflake::parse("0").is_none());
        assert!(Snowflake::parse("abc").is_none());
        assert_eq!(Snowflake::parse(" 42 "), Some(Snowflake(42)));
    }
}
