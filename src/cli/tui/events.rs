//! Event handling and input modes for TUI

use crate::error::OmniResult;
use crate::model::ModelReply;
use crate::session::PendingTurn;

/// Input mode for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and toggles
    #[default]
    Normal,
    /// Insert mode - typing messages
    Insert,
}

/// Result of a spawned model call, delivered back to the UI loop
pub struct ModelEvent {
    pub turn: PendingTurn,
    pub result: OmniResult<ModelReply>,
}
