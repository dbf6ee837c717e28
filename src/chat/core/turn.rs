//! Turn model for the conversation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker of a conversation turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The human user.
    User,
    /// The assistant persona.
    Assistant,
}

impl Speaker {
    /// Stable string form for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single immutable turn in the conversation log.
///
/// Turns are created on append and never mutated; their position in the
/// history is their chronological order. The timestamp is recorded for
/// diagnostics only and plays no part in prompt building.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced the text.
    pub speaker: Speaker,
    /// Utterance content.
    pub text: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Build a user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Build an assistant turn.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_as_str() {
        assert_eq!(Speaker::User.as_str(), "user");
        assert_eq!(Speaker::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_turn_constructors() {
        let user = Turn::user("hello");
        assert_eq!(user.speaker, Speaker::User);
        assert_eq!(user.text, "hello");

        let assistant = Turn::assistant("hi there");
        assert_eq!(assistant.speaker, Speaker::Assistant);
        assert_eq!(assistant.text, "hi there");
    }
}
