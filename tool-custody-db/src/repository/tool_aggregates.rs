use async_trait::async_trait;

use crate::models::aggregates::{CategoryCountModel, StatusCountModel};
use crate::models::tool::ToolModel;
use crate::repository::RepositoryError;

/// Filters of the tool listing. `limit` is applied after ordering by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolFilter {
    /// Exact status label
    pub status: Option<String>,
    /// `Some(true)` keeps checked-out tools only, `Some(false)` tools in stock
    pub checked_out: Option<bool>,
    pub limit: usize,
}

/// Read-only aggregates over the tool table.
#[async_trait]
pub trait ToolAggregates: Send + Sync {
    async fn count_tools(&self) -> Result<i64, RepositoryError>;

    async fn count_checked_out(&self) -> Result<i64, RepositoryError>;

    /// Tools with a holder, ordered by `tool_id`.
    async fn list_checked_out_tools(&self) -> Result<Vec<ToolModel>, RepositoryError>;

    /// Tools whose `calibration_due` is set, non-empty and not "N/A",
    /// ordered by the raw due marker then `tool_id`.
    async fn list_calibrated_tools(&self) -> Result<Vec<ToolModel>, RepositoryError>;

    async fn list_tools(&self, filter: &ToolFilter) -> Result<Vec<ToolModel>, RepositoryError>;

    /// Non-empty categories ordered by total descending, then name.
    async fn category_breakdown(&self) -> Result<Vec<CategoryCountModel>, RepositoryError>;

    /// Status labels ascending; tools without a label come last.
    async fn status_breakdown(&self) -> Result<Vec<StatusCountModel>, RepositoryError>;
}
