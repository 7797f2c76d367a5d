use async_trait::async_trait;

use crate::models::tool::ToolModel;
use crate::repository::RepositoryError;

/// Looks up a tool by its business key (`tool_id`, not the row UUID).
///
/// Inside a unit of work implementations lock the row until commit or
/// rollback, so two toggles of the same tool queue behind each other.
#[async_trait]
pub trait FindToolById: Send + Sync {
    async fn find_tool_by_id(&self, tool_id: &str) -> Result<Option<ToolModel>, RepositoryError>;
}
