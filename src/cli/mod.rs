pub mod console;
#[cfg(feature = "tui")]
pub mod tui;
