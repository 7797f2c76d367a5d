pub mod find_by_username;
pub mod repo_impl;

pub use repo_impl::ActorRepositoryImpl;
