use async_trait::async_trait;
use tool_custody_db::models::{CheckoutAction, CheckoutEventModel};
use tool_custody_db::repository::{BulkFindCheckoutEventsByToolIds, RepositoryError};

use super::PostgresReadModel;
use crate::repository::custody::checkout_event_repository::bulk_find_checkouts;
use crate::utils::rows_into;

#[async_trait]
impl BulkFindCheckoutEventsByToolIds for PostgresReadModel {
    async fn bulk_find_checkout_events_by_tool_ids(
        &self,
        tool_ids: &[String],
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError> {
        if tool_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(bulk_find_checkouts::BULK_CHECKOUTS_QUERY)
            .bind(CheckoutAction::Checkout)
            .bind(tool_ids)
            .fetch_all(&*self.pool)
            .await?;
        rows_into(&rows)
    }
}
