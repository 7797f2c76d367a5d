pub mod append;
pub mod bulk_find_checkouts;
pub mod repo_impl;

pub use repo_impl::CheckoutEventRepositoryImpl;
