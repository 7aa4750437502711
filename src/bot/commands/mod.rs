//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Credit balance and gifting commands
pub mod economy;

/// General utility commands
pub mod general;

/// Daily mission commands
pub mod missions;

/// Pokemon sprite commands
pub mod pokemon;

// Export commands
pub use economy::*;
pub use general::*;
pub use missions::*;
pub use pokemon::*;
