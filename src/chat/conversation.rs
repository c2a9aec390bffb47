//! Conversation history with a bounded persisted window

use std::sync::Arc;

use crate::core::KvStore;
use crate::error::OmniResult;
use crate::model::ApiMessage;
use super::types::Message;

/// Storage key for the persisted history
pub const HISTORY_KEY: &str = "omni_history";

/// Number of most recent messages that survive a reload
pub const HISTORY_LIMIT: usize = 40;

/// Append-only conversation history.
///
/// The in-memory sequence may grow past [`HISTORY_LIMIT`]; only the most
/// recent window is written to the persistence collaborator, after every
/// mutation. Persistence is best-effort: failures are logged and dropped.
pub struct ConversationStore {
    messages: Vec<Message>,
    store: Arc<dyn KvStore>,
}

impl ConversationStore {
    /// Start with an empty history without touching storage
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            messages: Vec::new(),
            store,
        }
    }

    /// Hydrate from storage; any failure means "no prior history"
    pub fn load(store: Arc<dyn KvStore>) -> Self {
        let messages = match Self::read_persisted(store.as_ref()) {
            Ok(messages) => {
                tracing::debug!("Loaded {} messages from history", messages.len());
                messages
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable conversation history: {}", e);
                Vec::new()
            }
        };
        Self { messages, store }
    }

    fn read_persisted(store: &dyn KvStore) -> OmniResult<Vec<Message>> {
        match store.get(HISTORY_KEY)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    /// Append a message and persist the trimmed window
    pub fn append(&mut self, message: Message) -> &Message {
        let index = self.messages.len();
        self.messages.push(message);
        self.save();
        &self.messages[index]
    }

    /// Full in-memory history, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent messages eligible for persistence
    pub fn persisted_window(&self) -> &[Message] {
        let start = self.messages.len().saturating_sub(HISTORY_LIMIT);
        &self.messages[start..]
    }

    /// Role/content pairs for the model, everything else stripped
    pub fn api_messages(&self) -> Vec<ApiMessage> {
        self.messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role,
                content: m.content.clone(),
            })
            .collect()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Persist the trimmed window; returns whether the write succeeded
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save conversation history: {}", e);
                false
            }
        }
    }

    fn try_save(&self) -> OmniResult<()> {
        let data = serde_json::to_string(self.persisted_window())?;
        self.store.set(HISTORY_KEY, &data)?;
        Ok(())
    }

    /// Drop all history, in memory and in storage
    pub fn clear(&mut self) {
        self.messages.clear();
        if let Err(e) = self.store.delete(HISTORY_KEY) {
            tracing::warn!("Failed to delete persisted history: {}", e);
        }
    }
}
