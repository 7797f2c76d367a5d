pub mod find_by_tool_id;
pub mod repo_impl;
pub mod update_custody;

pub use repo_impl::ToolRepositoryImpl;
