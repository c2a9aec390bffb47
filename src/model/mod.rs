//! Model API collaborator
//!
//! The chat core only needs "instructions + role/content history in, reply
//! text + search flag + token usage out". Transport and authentication live
//! behind [`ChatModel`]; the crate ships an offline [`EchoModel`] and a
//! deterministic [`ScriptedModel`] for tests.

mod echo;
mod scripted;

pub use echo::EchoModel;
pub use scripted::{ScriptedModel, ScriptedReply};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chat::Role;
use crate::error::OmniResult;

/// Message as sent to the model: role and content only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: Role,
    pub content: String,
}

/// Everything a model call needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    /// Persona instructions combined with memory notes and the date line
    pub instructions: String,
    pub messages: Vec<ApiMessage>,
    /// Offer the web search capability to the model
    pub web_search: bool,
}

/// Token counters reported by the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    pub fn total(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// A completed model turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelReply {
    pub text: String,
    /// True when the model exercised the search capability
    pub searched: bool,
    pub usage: Option<Usage>,
}

impl ModelReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Short identifier shown in status lines
    fn name(&self) -> &str;

    async fn complete(&self, request: ModelRequest) -> OmniResult<ModelReply>;
}
