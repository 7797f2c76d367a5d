pub mod models;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;

#[cfg(feature = "memory")]
pub mod memory;

pub use models::*;
pub use repository::*;

#[cfg(feature = "memory")]
pub use memory::{InMemoryLedger, MemorySession};
