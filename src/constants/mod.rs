//! Generation constants organized by domain.
//!
//! These are the defaults behind every config struct; callers override them
//! through `GenerationConfig` rather than by editing this module.

mod layout;
mod pathfinding;
mod rewrite;

pub use layout::*;
pub use pathfinding::*;
pub use rewrite::*;
