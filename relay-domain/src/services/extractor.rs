use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::{ParsedEvent, PlayerRecord, RawMessage};

static LICENSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)License:\s*license:([a-f0-9]{32})").expect("license pattern compiles")
});

// Details never span lines. A blank rest of line still takes its slot.
static PLAYER_DETAILS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Player Details:[ \t]*([^\r\n]*)").expect("details pattern compiles")
});

static CLOCK_TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[?([0-9]{1,2}:[0-9]{2})\]?").expect("clock pattern compiles")
});

/// Turns a raw message into the normalized text, the players found in it and
/// the time of death.
pub fn extract(message: &RawMessage) -> ParsedEvent {
    let joined_text = join_message_text(message);
    let players = pair_players(
        extract_licenses(&joined_text),
        extract_player_details(&joined_text),
    );
    let time_of_death = extract_clock_time(&joined_text)
        .unwrap_or_else(|| render_creation_time(&message.created_at));

    ParsedEvent {
        joined_text,
        players,
        time_of_death,
    }
}

/// Embeds first, in message order, then the plain content as the last line.
pub fn join_message_text(message: &RawMessage) -> String {
    let mut lines: Vec<String> = message
        .embeds
        .iter()
        .flat_map(|embed| embed.text_lines())
        .collect();
    if let Some(content) = message.content.as_deref().filter(|text| !text.is_empty()) {
        lines.push(content.to_string());
    }
    lines.join("\n")
}

pub fn extract_licenses(text: &str) -> Vec<String> {
    LICENSE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|token| token.as_str().to_string())
        .collect()
}

pub fn extract_player_details(text: &str) -> Vec<String> {
    PLAYER_DETAILS_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|details| details.as_str().trim().to_string())
        .collect()
}

/// Pairs the n-th license with the n-th details line. Order of appearance is
/// the only link between the two; surplus details are ignored and missing
/// ones become the unknown placeholder.
pub fn pair_players(licenses: Vec<String>, details: Vec<String>) -> Vec<PlayerRecord> {
    let mut details = details.into_iter();
    licenses
        .into_iter()
        .map(|license| match details.next() {
            Some(player_details) => PlayerRecord::new(license, player_details),
            None => PlayerRecord::with_unknown_details(license),
        })
        .collect()
}

/// First `H:MM` / `HH:MM` token, brackets stripped. No range checks.
pub fn extract_clock_time(text: &str) -> Option<String> {
    CLOCK_TIME_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|time| time.as_str().to_string())
}

/// ISO-8601 with a `+00:00` offset. Any sub-second part is written as six
/// digits, whole seconds carry no fraction.
pub fn render_creation_time(created_at: &DateTime<Utc>) -> String {
    let precision = if created_at.nanosecond() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    created_at.to_rfc3339_opts(precision, false)
}
