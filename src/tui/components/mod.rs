//! TUI components

mod help;

pub use help::HelpOverlay;
