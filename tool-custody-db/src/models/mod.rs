pub mod actor;
pub mod aggregates;
pub mod checkout_event;
pub mod tool;

// Re-exports
pub use actor::*;
pub use aggregates::*;
pub use checkout_event::*;
pub use tool::*;
