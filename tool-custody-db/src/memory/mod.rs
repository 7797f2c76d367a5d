pub mod ledger;
pub mod read_model;
pub mod session;

pub use ledger::InMemoryLedger;
pub use session::MemorySession;
