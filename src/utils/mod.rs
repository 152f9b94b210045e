//! Utility modules for common functionality

pub mod signal;
pub mod terminal;

// Re-export commonly used items
pub use signal::wait_for_interrupt;
pub use terminal::clear_transient_line;

// vim: ts=4
