//! Discord framework hooks
//!
//! Handlers that run outside of any single command: the global command check and the
//! gateway event listener.

/// Per-user command cooldown check
pub mod cooldown;
/// Member join welcome message
pub mod welcome;
