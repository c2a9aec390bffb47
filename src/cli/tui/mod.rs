//! TUI module for the Omni chat client
//!
//! Provides a full-screen chat interface with:
//! - Message input with history
//! - Rendered conversation with per-persona styling
//! - Persona picker and memory note overlays
//! - Status bar with toggles and token usage

mod app;
mod events;
mod markdown;
mod ui;

pub use app::App;
pub use app::run;
