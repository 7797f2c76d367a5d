use async_trait::async_trait;

use crate::models::tool::ToolModel;
use crate::repository::RepositoryError;

/// Persists the custody fields of a tool: `held_by`, `checkout_time` and
/// `checkin_time`. Other columns are left untouched.
#[async_trait]
pub trait UpdateToolCustody: Send + Sync {
    /// Fails when no tool with `tool.tool_id` exists.
    async fn update_tool_custody(&self, tool: &ToolModel) -> Result<(), RepositoryError>;
}
