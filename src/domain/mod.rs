//! Domain layer: catalog trees, listings and section extraction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod listing;
pub mod section;

pub use arena::{NodeData, NodeKind, TreeArena, TreeNode};
pub use builder::TreeBuilder;
pub use error::DomainError;
pub use generational_arena::Index;
pub use listing::{Listing, ListingEntry};
pub use section::{extract_section, headings};
