pub mod append_event;
pub mod bulk_find_checkout_events_by_tool_ids;
pub mod find_actor_by_username;
pub mod find_tool_by_id;
pub mod ledger_aggregates;
pub mod pagination;
pub mod read_model;
pub mod tool_aggregates;
pub mod unit_of_work;
pub mod update_tool_custody;

/// Error type shared by every repository trait.
pub type RepositoryError = Box<dyn std::error::Error + Send + Sync>;

// Re-exports
pub use append_event::*;
pub use bulk_find_checkout_events_by_tool_ids::*;
pub use find_actor_by_username::*;
pub use find_tool_by_id::*;
pub use ledger_aggregates::*;
pub use pagination::*;
pub use read_model::*;
pub use tool_aggregates::*;
pub use unit_of_work::*;
pub use update_tool_custody::*;
