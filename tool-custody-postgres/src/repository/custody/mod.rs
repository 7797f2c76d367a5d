pub mod actor_repository;
pub mod checkout_event_repository;
pub mod factory;
pub mod session;
pub mod tool_repository;

#[cfg(test)]
pub mod test_utils;

pub use factory::{CustodyRepoFactory, CustodyRepositories};
pub use session::PostgresCustodySession;
