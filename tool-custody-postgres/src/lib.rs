pub mod postgres_repositories;
pub mod read_model;
pub mod repository;
pub mod utils;

pub use postgres_repositories::PostgresRepositories;
pub use read_model::PostgresReadModel;
pub use repository::custody::PostgresCustodySession;
pub use repository::db_init::{cleanup_database, init_database};

#[cfg(test)]
pub mod test_helper;
