//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits, the `man` provider and wires up services.

pub mod di;
pub mod error;
pub mod man;
pub mod overstrike;
pub mod traits;

pub use error::{InfraError, InfraResult};
