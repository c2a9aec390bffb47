//! Conversation and memory state
//!
//! This module provides the entities and stores behind a chat session:
//! - **Message**: one immutable turn, tagged with the persona active at creation
//! - **ConversationStore**: append-only history, persisted as a bounded window
//! - **MemoryStore**: user-authored notes injected into future instructions
//! - **build_instruction_context**: persona + notes + date in one string
//! - **detect_fact_candidates**: inert hook for fact-like phrases in replies
//!
//! Both stores talk to a [`KvStore`](crate::core::KvStore) and treat it as
//! best-effort: load and save failures are logged, never surfaced.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use omni::chat::{ConversationStore, MemoryStore, Message};
//! use omni::core::MemoryKvStore;
//!
//! let kv = Arc::new(MemoryKvStore::new());
//! let mut history = ConversationStore::load(kv.clone());
//! history.append(Message::user("Hello!", "omni"));
//!
//! let mut memory = MemoryStore::load(kv);
//! let id = memory.add_note("Prefers short answers").unwrap();
//! assert!(memory.remove_note(id));
//! ```

pub mod context;
pub mod conversation;
pub mod facts;
pub mod memory;
pub mod types;

pub use context::build_instruction_context;
pub use conversation::{ConversationStore, HISTORY_KEY, HISTORY_LIMIT};
pub use facts::{detect_fact_candidates, FactCandidate, FactObserver};
pub use memory::{MemoryStore, MEMORY_KEY};
pub use types::{MemoryNote, Message, NoteId, Role};
pub use crate::model::Usage;
