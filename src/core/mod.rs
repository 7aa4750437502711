//! Core business logic - framework-agnostic operations used by the Discord layer.

/// Paced asynchronous iteration
pub mod async_iter;
/// Multi-party confirmation dialogs
pub mod confirm;
/// Per-user command cooldowns
pub mod cooldown;
/// Credit balances and transfers
pub mod economy;
/// Sprite file names and URLs
pub mod images;
/// Daily missions and rewards
pub mod missions;
/// Page splitting and menu navigation
pub mod pagination;
