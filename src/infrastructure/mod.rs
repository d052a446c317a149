//! Infrastructure layer: lookup implementations and DI container
//!
//! This layer implements the record lookup boundary and wires up services.

pub mod di;
pub mod error;
pub mod memory;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use memory::InMemoryLookup;
pub use traits::{LookupError, NotionClient, RecordLookup};
