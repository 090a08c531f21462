//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the catalog tree rules.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("nothing found for location: {0}")]
    EmptyListing(String),

    #[error("unknown node")]
    UnknownNode,

    #[error("node is not registered under any location: {title}")]
    UnregisteredRoot { title: String },
}
