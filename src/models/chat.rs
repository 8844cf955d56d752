use serde::{ Serialize, Deserialize };
use std::fmt;
use std::str::FromStr;

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "You")]
    User,
    #[serde(rename = "Teacher")]
    Teacher,
}

impl Speaker {
    /// Label used by the backend when it stores a message.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Teacher => "Teacher",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseSpeakerError {
    label: String,
}

impl fmt::Display for ParseSpeakerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown speaker label: '{}'", self.label)
    }
}

impl std::error::Error for ParseSpeakerError {}

impl FromStr for Speaker {
    type Err = ParseSpeakerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "You" => Ok(Speaker::User),
            "Teacher" => Ok(Speaker::Teacher),
            _ =>
                Err(ParseSpeakerError {
                    label: s.to_string(),
                }),
        }
    }
}

/// One entry of the conversation. Identity is positional; two messages with
/// the same content are still distinct entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Speaker,
    pub content: String,
    pub timestamp: String,
}

impl Message {
    pub fn new(role: Speaker, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(Speaker::User, content, timestamp)
    }

    pub fn teacher(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(Speaker::Teacher, content, timestamp)
    }
}
