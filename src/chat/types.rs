//! Core types for the chat module

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a memory note (creation instant in epoch millis)
pub type NoteId = u64;

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant/AI response
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn in a conversation. Never mutated once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    /// Raw text; rendering is re-derived on display
    pub content: String,
    /// Persona key active when the message was created
    pub mode: String,
    #[serde(rename = "ts", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub searched: bool,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl Message {
    pub fn user(content: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            mode: mode.into(),
            timestamp: Utc::now(),
            searched: false,
            is_error: false,
        }
    }

    pub fn assistant(content: impl Into<String>, mode: impl Into<String>, searched: bool) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            mode: mode.into(),
            timestamp: Utc::now(),
            searched,
            is_error: false,
        }
    }

    /// Assistant-role message describing a failed model call
    pub fn error(detail: impl std::fmt::Display, mode: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: format!("**Error:** {}", detail),
            mode: mode.into(),
            timestamp: Utc::now(),
            searched: false,
            is_error: true,
        }
    }
}

/// A user-authored fact injected into future instructions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryNote {
    pub id: NoteId,
    /// Trimmed, never empty
    pub text: String,
    #[serde(rename = "ts")]
    pub created_at: DateTime<Utc>,
}
