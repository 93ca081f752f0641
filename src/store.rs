//! Per-sender short-term conversation memory
//!
//! Process-local only: a restart or a second serving instance starts with
//! empty histories. Durability is out of scope; the store's contract is the
//! most recent [`MAX_TURNS`] turns per sender, oldest evicted first.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Maximum turns retained per sender (FIFO truncation)
pub const MAX_TURNS: usize = 10;

/// Originating role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the end user
    User,
    /// Reply generated by the assistant
    Assistant,
}

impl Role {
    /// Label used when serializing history into a prompt
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message exchanged in a conversation, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced the turn
    pub role: Role,
    /// Message text
    pub content: String,
}

impl Turn {
    /// Create a user turn
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// In-memory conversation store keyed by sender identifier
///
/// Appends are atomic append-and-truncate under the lock, so concurrent
/// messages from one sender cannot lose turns mid-append.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: Mutex<HashMap<String, VecDeque<Turn>>>,
}

impl ConversationStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to a sender's conversation, evicting the oldest turns
    /// beyond [`MAX_TURNS`]
    pub fn append(&self, sender: &str, turn: Turn) {
        let mut conversations = self
            .conversations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let history = conversations.entry(sender.to_string()).or_default();
        history.push_back(turn);
        while history.len() > MAX_TURNS {
            history.pop_front();
        }
    }

    /// Current conversation for a sender, oldest first; empty if unseen
    #[must_use]
    pub fn history(&self, sender: &str) -> Vec<Turn> {
        self.conversations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(sender)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of turns stored for a sender
    #[must_use]
    pub fn len(&self, sender: &str) -> usize {
        self.conversations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(sender)
            .map_or(0, VecDeque::len)
    }

    /// Whether a sender has no stored turns
    #[must_use]
    pub fn is_empty(&self, sender: &str) -> bool {
        self.len(sender) == 0
    }
}
