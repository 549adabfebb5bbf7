//! Conversation turns and per-session history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Farmer's question
    User,
    /// Assistant's pivot-language answer
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single turn in the conversation, always in the pivot language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Role of the speaker
    pub role: TurnRole,
    /// Content of the turn
    pub content: String,
    /// When the turn occurred
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Create a new turn
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }
}

/// Ordered turn history owned by one logical chat session.
///
/// Turns are only ever appended; the sole removal path is
/// [`ConversationSession::evict_oldest`], which drops from the front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    id: String,
    turns: Vec<ConversationTurn>,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            turns: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Append a completed user/assistant exchange
    pub fn record_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(ConversationTurn::user(user));
        self.turns.push(ConversationTurn::assistant(assistant));
        self.last_active = Utc::now();
    }

    /// Drop the oldest turns until at most `max_turns` remain.
    ///
    /// Returns the number of evicted turns. `max_turns == 0` means unbounded.
    pub fn evict_oldest(&mut self, max_turns: usize) -> usize {
        if max_turns == 0 || self.turns.len() <= max_turns {
            return 0;
        }
        let excess = self.turns.len() - max_turns;
        self.turns.drain(..excess);
        excess
    }

    /// Whether the session has been idle for longer than `idle`
    pub fn is_idle_for(&self, idle: chrono::Duration) -> bool {
        Utc::now() - self.last_active > idle
    }
}
