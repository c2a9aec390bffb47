//! Omni: a persona-driven chat client with a safe markup renderer.
//!
//! This library provides:
//! - A markdown-subset renderer producing a typed [`Document`] with HTML and
//!   plain-text emitters
//! - A bounded, persisted conversation history
//! - User-authored memory notes injected into the model instructions
//! - A registry of built-in personas
//! - A session coordinator serializing sends to a pluggable model
//! - Console and TUI front ends
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use omni::{ChatSession, Config};
//! use omni::core::MemoryKvStore;
//!
//! let mut session = ChatSession::open(Arc::new(MemoryKvStore::new()), &Config::default());
//! session.set_persona("coder").unwrap();
//! let turn = session.begin_send("Explain lifetimes").unwrap();
//! assert!(turn.request.instructions.contains("Current mode: CODER."));
//! ```

pub mod chat;
pub mod cli;
pub mod core;
pub mod error;
pub mod markup;
pub mod model;
pub mod persona;
pub mod session;

// Re-export key types
pub use crate::chat::{ConversationStore, MemoryNote, MemoryStore, Message, Role};
pub use crate::core::{FjallStore, KvStore, MemoryKvStore};
pub use crate::error::{OmniError, OmniResult};
pub use crate::markup::{render, Document};
pub use crate::model::{ChatModel, EchoModel, ModelReply, ModelRequest};
pub use crate::persona::{Persona, PersonaRegistry, DEFAULT_PERSONA};
pub use crate::session::{ChatSession, PendingTurn};

use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for an Omni session
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Persona key selected at startup
    pub persona: String,
    pub web_search: bool,
    pub memory_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            persona: DEFAULT_PERSONA.to_string(),
            web_search: false,
            memory_enabled: true,
        }
    }
}

impl Config {
    /// Open the on-disk store under `data_dir`
    pub fn open_store(&self) -> OmniResult<Arc<FjallStore>> {
        std::fs::create_dir_all(&self.data_dir)?;
        let store = FjallStore::open(&self.data_dir)?;
        Ok(Arc::new(store))
    }
}
