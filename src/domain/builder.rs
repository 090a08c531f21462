//! Tree builder turning provider listings into catalog hierarchies.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::error::DomainError;
use crate::domain::listing::Listing;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs the three-level catalog → category → document hierarchy.
#[derive(Debug, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Insert one tree for `location` into `arena` and return its root.
    ///
    /// Categories and documents are appended in listing order.
    #[instrument(level = "debug", skip(self, arena, listing))]
    pub fn build(
        &self,
        arena: &mut TreeArena,
        location: &str,
        listing: &Listing,
    ) -> TreeResult<Index> {
        if listing.is_empty() {
            return Err(DomainError::EmptyListing(location.to_string()));
        }

        let root = arena.insert_node(NodeData::catalog(location), None);
        for (category, documents) in listing.groups() {
            let category_idx = arena.insert_node(NodeData::category(category), Some(root));
            for document in documents {
                arena.insert_node(NodeData::document(document), Some(category_idx));
            }
        }

        debug!(
            "build: location={} categories={} documents={}",
            location,
            arena.children(root).len(),
            listing.len()
        );
        Ok(root)
    }
}
