//! Interactive message components - confirmation prompts, paginated menus and selects.

/// Confirm/deny prompt backing the confirmation coordinator
pub mod confirm;
/// Paginated menus
pub mod menu;
/// Drop-down selection
pub mod select;
