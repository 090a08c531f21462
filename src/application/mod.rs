//! Application layer: the document catalog and its transient pages
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod artifacts;
pub mod catalog;
pub mod error;
pub mod error_ext;

pub use artifacts::ArtifactTracker;
pub use catalog::{
    file_uri, Catalog, CatalogEntry, RenderedDoc, DETAILS_SECTION, PLACEHOLDER_PAGE,
};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
