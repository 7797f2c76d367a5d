use async_trait::async_trait;
use tool_custody_db::models::tool::ToolModel;
use tool_custody_db::repository::{FindToolById, RepositoryError};
use crate::utils::TryFromRow;

use super::repo_impl::ToolRepositoryImpl;

impl ToolRepositoryImpl {
    /// Locks the row for the rest of the transaction.
    pub(super) async fn find_by_tool_id_impl(
        repo: &ToolRepositoryImpl,
        tool_id: &str,
    ) -> Result<Option<ToolModel>, RepositoryError> {
        let query =
            sqlx::query(r#"SELECT * FROM tool WHERE tool_id = $1 FOR UPDATE"#).bind(tool_id);
        let row = {
            let mut tx = repo.executor.tx.lock().await;
            if let Some(transaction) = tx.as_mut() {
                query.fetch_optional(&mut **transaction).await?
            } else {
                return Err("Transaction has been consumed".into());
            }
        };

        row.as_ref().map(ToolModel::try_from_row).transpose()
    }
}

#[async_trait]
impl FindToolById for ToolRepositoryImpl {
    async fn find_tool_by_id(&self, tool_id: &str) -> Result<Option<ToolModel>, RepositoryError> {
        Self::find_by_tool_id_impl(self, tool_id).await
    }
}
