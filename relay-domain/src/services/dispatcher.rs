use thiserror::Error;

use crate::entities::{ParsedEvent, RawMessage, RuntimeConfig};

/// Why a message was not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DropReason {
    #[error("author {0} is not the target account")]
    WrongAuthor(u64),
    #[error("channel {0} is not the log channel")]
    WrongChannel(u64),
    #[error("message has no text content")]
    EmptyContent,
    #[error("no license found in message")]
    NoLicenses,
}

/// Only the configured account posting in the configured log channel is
/// considered. Checked before any parsing happens.
pub fn check_origin(config: &RuntimeConfig, message: &RawMessage) -> Result<(), DropReason> {
    if message.author_id != config.target_author_id {
        return Err(DropReason::WrongAuthor(message.author_id));
    }
    if message.channel_id != config.log_channel_id {
        return Err(DropReason::WrongChannel(message.channel_id));
    }
    Ok(())
}

pub fn check_content(parsed: &ParsedEvent) -> Result<(), DropReason> {
    if parsed.joined_text.is_empty() {
        return Err(DropReason::EmptyContent);
    }
    if parsed.players.is_empty() {
        return Err(DropReason::NoLicenses);
    }
    Ok(())
}
