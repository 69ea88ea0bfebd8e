//! Conversation turn types.
//!
//! A turn is one message in a conversation, tagged by speaker role. Turns
//! are immutable once created; their insertion order is the conversation
//! order and is also the exact payload sent to the remote assistant.

use serde::{Deserialize, Serialize};

/// The speaker of a conversation turn.
///
/// This is a closed set: anything else found in persisted data is rejected
/// at the persistence boundary rather than carried along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Turn written by the visitor.
    User,
    /// Turn produced by the assistant (including the seed greeting and the
    /// fallback reply).
    Assistant,
}

/// A single turn in a conversation transcript.
///
/// Serialized form is exactly `{"role": "...", "text": "..."}`; the
/// persisted transcript is an ordered array of these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Turn {
    /// Who spoke this turn.
    pub role: TurnRole,
    /// The turn content.
    pub text: String,
}

impl Turn {
    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    /// Creates an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}
