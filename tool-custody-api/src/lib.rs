pub mod config;
pub mod dashboard;
pub mod error;
pub mod reports;
pub mod toggle;

pub use config::*;
pub use dashboard::*;
pub use error::*;
pub use reports::*;
pub use toggle::*;
