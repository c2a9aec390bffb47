//! User-authored memory notes

use std::collections::HashSet;
use std::sync::Arc;
use chrono::{DateTime, Utc};

use crate::core::KvStore;
use crate::error::OmniResult;
use super::types::{MemoryNote, NoteId};

/// Storage key for the persisted note list
pub const MEMORY_KEY: &str = "omni_memory";

/// Ordered list of memory notes, persisted after every mutation.
///
/// Notes are only ever created by [`MemoryStore::add_note`]; nothing in the
/// crate adds notes on its own.
pub struct MemoryStore {
    notes: Vec<MemoryNote>,
    store: Arc<dyn KvStore>,
    last_id: NoteId,
}

impl MemoryStore {
    /// Start with no notes without touching storage
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            notes: Vec::new(),
            store,
            last_id: 0,
        }
    }

    /// Hydrate from storage; any failure means "no notes"
    pub fn load(store: Arc<dyn KvStore>) -> Self {
        let notes = match Self::read_persisted(store.as_ref()) {
            Ok(notes) => notes,
            Err(e) => {
                tracing::warn!("Ignoring unreadable memory notes: {}", e);
                Vec::new()
            }
        };

        // Keep the invariants even if someone edited the stored copy
        let mut seen = HashSet::new();
        let notes: Vec<MemoryNote> = notes
            .into_iter()
            .filter(|n| !n.text.trim().is_empty() && seen.insert(n.id))
            .collect();
        let last_id = notes.iter().map(|n| n.id).max().unwrap_or(0);
        tracing::debug!("Loaded {} memory notes", notes.len());

        Self { notes, store, last_id }
    }

    fn read_persisted(store: &dyn KvStore) -> OmniResult<Vec<MemoryNote>> {
        match store.get(MEMORY_KEY)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    /// Add a note. Blank text is rejected and returns `None`.
    pub fn add_note(&mut self, text: &str) -> Option<NoteId> {
        self.add_note_at(text, Utc::now())
    }

    pub(crate) fn add_note_at(&mut self, text: &str, now: DateTime<Utc>) -> Option<NoteId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let id = self.next_id(now);
        self.notes.push(MemoryNote {
            id,
            text: text.to_string(),
            created_at: now,
        });
        self.save();
        Some(id)
    }

    /// Ids follow the clock but never repeat within a store
    fn next_id(&mut self, now: DateTime<Utc>) -> NoteId {
        let from_clock = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = from_clock.max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }

    /// Remove the note with `id`; returns false when no such note exists
    pub fn remove_note(&mut self, id: NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return false;
        }
        self.save();
        true
    }

    pub fn notes(&self) -> &[MemoryNote] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&MemoryNote> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Persist all notes; returns whether the write succeeded
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save memory notes: {}", e);
                false
            }
        }
    }

    fn try_save(&self) -> OmniResult<()> {
        let data = serde_json::to_string(&self.notes)?;
        self.store.set(MEMORY_KEY, &data)?;
        Ok(())
    }
}
