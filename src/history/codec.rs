//! Wire encoding of stored history lines.
//!
//! The backend stores each message as a single string `"<Role>: <content>"`
//! where `<Role>` is a [`Speaker`] label. Decoding splits on the first `": "`
//! only, so content may itself contain the separator.

use crate::models::api::HistoryRecord;
use crate::models::chat::{ Message, Speaker };
use std::fmt;

pub const SEPARATOR: &str = ": ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    MissingSeparator(String),
    UnknownSpeaker(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingSeparator(line) =>
                write!(f, "history line has no role separator: '{}'", line),
            DecodeError::UnknownSpeaker(label) =>
                write!(f, "history line has unknown role '{}'", label),
        }
    }
}

impl std::error::Error for DecodeError {}

pub fn encode_line(role: Speaker, content: &str) -> String {
    format!("{}{}{}", role.label(), SEPARATOR, content)
}

pub fn decode_line(line: &str) -> Result<(Speaker, String), DecodeError> {
    let (label, content) = line
        .split_once(SEPARATOR)
        .ok_or_else(|| DecodeError::MissingSeparator(line.to_string()))?;
    let role = label
        .parse::<Speaker>()
        .map_err(|_| DecodeError::UnknownSpeaker(label.to_string()))?;
    Ok((role, content.to_string()))
}

pub fn decode_record(record: &HistoryRecord) -> Result<Message, DecodeError> {
    let (role, content) = decode_line(&record.message)?;
    Ok(Message {
        role,
        content,
        timestamp: record.timestamp.clone(),
    })
}

pub fn encode_record(message: &Message) -> HistoryRecord {
    HistoryRecord {
        message: encode_line(message.role, &message.content),
        timestamp: message.timestamp.clone(),
    }
}
