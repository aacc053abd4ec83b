//! Chat transcript types.
//!
//! A [`Transcript`] is the ordered log of turns shown to the user. It is
//! append-only for the lifetime of a session: entries are never removed,
//! reordered or deduplicated, and nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Author of a transcript entry.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// The local user.
    User,
    /// The remote agent, or a synthetic entry standing in for it.
    Agent,
}

// ---------------------------------------------------------------------------
// TranscriptEntry
// ---------------------------------------------------------------------------

/// One turn of the conversation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Who produced the entry.
    pub role: Role,
    /// Text as displayed.
    pub content: String,
}

impl TranscriptEntry {
    /// Entry authored by the local user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Entry attributed to the agent.
    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Append-only, insertion-ordered chat log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// An empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end of the log.
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }

    /// Most recent entry, if any.
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing has been exchanged yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// OutgoingMessage
// ---------------------------------------------------------------------------

/// A chat message that passed the non-blank check, already trimmed.
///
/// ```
/// use agentdesk_models::OutgoingMessage;
///
/// let msg = OutgoingMessage::parse("  hi there \n").unwrap();
/// assert_eq!(msg.as_str(), "hi there");
/// assert!(OutgoingMessage::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage(String);

impl OutgoingMessage {
    /// Trim the draft and reject it if nothing is left.
    pub fn parse(draft: &str) -> Result<Self, ModelError> {
        let trimmed = draft.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyMessage);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the trimmed text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the trimmed text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
