// src/core/types.rs - Conversation data model

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message. Owned by exactly one [`Session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Quick-reply labels. Only bot messages carry them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl Message {
    pub fn user(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender: Sender::User,
            timestamp,
            suggestions: None,
        }
    }

    pub fn bot(text: impl Into<String>, suggestions: Vec<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender: Sender::Bot,
            timestamp,
            suggestions: Some(suggestions),
        }
    }

    /// Suggestions as a slice; empty for user messages.
    pub fn suggestions(&self) -> &[String] {
        self.suggestions.as_deref().unwrap_or(&[])
    }
}

/// Auxiliary per-session state. Passed through untouched.
pub type SessionContext = HashMap<String, serde_json::Value>;

/// A conversation with one client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub messages: Vec<Message>,
    pub context: SessionContext,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
            context: SessionContext::new(),
            created_at,
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Closed set of intent categories the matcher can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    Greetings,
    Thanks,
    Goodbye,
    Unknown,
}

impl IntentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::Greetings => "greetings",
            IntentCategory::Thanks => "thanks",
            IntentCategory::Goodbye => "goodbye",
            IntentCategory::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, IntentCategory::Unknown)
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub category: IntentCategory,
    /// In `[0, 1]`. Zero for `Unknown`.
    pub score: f64,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            category: IntentCategory::Unknown,
            score: 0.0,
        }
    }
}

/// Which branch produced the bot reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyRoute {
    /// Canned response for a matched intent.
    Local(IntentCategory),
    /// Text returned by the generation gateway.
    Remote,
    /// Gateway failed or timed out.
    Fallback,
}

/// What `process` hands back to the transport.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub session_id: String,
    /// The bot message just recorded.
    pub message: Message,
    pub context: SessionContext,
    #[serde(skip)]
    pub route: ReplyRoute,
}
