use async_trait::async_trait;
use tool_custody_db::models::checkout_event::{CheckoutAction, CheckoutEventModel};
use tool_custody_db::repository::{BulkFindCheckoutEventsByToolIds, RepositoryError};
use crate::utils::rows_into;

use super::repo_impl::CheckoutEventRepositoryImpl;

pub(crate) const BULK_CHECKOUTS_QUERY: &str = r#"
    SELECT * FROM checkout_event
    WHERE action = $1 AND tool_id = ANY($2)
    ORDER BY event_time DESC
"#;

impl CheckoutEventRepositoryImpl {
    pub(super) async fn bulk_find_checkouts_impl(
        repo: &CheckoutEventRepositoryImpl,
        tool_ids: &[String],
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError> {
        if tool_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = sqlx::query(BULK_CHECKOUTS_QUERY)
            .bind(CheckoutAction::Checkout)
            .bind(tool_ids);
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            if let Some(transaction) = tx.as_mut() {
                query.fetch_all(&mut **transaction).await?
            } else {
                return Err("Transaction has been consumed".into());
            }
        };

        rows_into(&rows)
    }
}

#[async_trait]
impl BulkFindCheckoutEventsByToolIds for CheckoutEventRepositoryImpl {
    async fn bulk_find_checkout_events_by_tool_ids(
        &self,
        tool_ids: &[String],
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError> {
        Self::bulk_find_checkouts_impl(self, tool_ids).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::TestError;
    use crate::test_helper::setup_test_context;
    use super::super::super::test_utils::test_utils::create_test_event;
    use chrono::{Duration, Utc};
    use tool_custody_db::models::checkout_event::CheckoutAction;
    use tool_custody_db::repository::{AppendEvent, BulkFindCheckoutEventsByToolIds};

    #[tokio::test]
    #[ignore]
    async fn test_append_and_bulk_find() -> Result<(), TestError> {
        let ctx = setup_test_context().await?;
        let event_repo = &ctx.custody_repos().checkout_event_repository;

        let now = Utc::now();
        let checkout = CheckoutAction::Checkout;
        let older = create_test_event("PG-EVT-001", "alice", checkout, now - Duration::hours(2));
        let newer = create_test_event("PG-EVT-001", "bob", checkout, now - Duration::hours(1));
        let checkin = create_test_event("PG-EVT-001", "bob", CheckoutAction::Checkin, now);
        let other = create_test_event("PG-EVT-002", "carol", CheckoutAction::Checkout, now);
        for event in [&older, &newer, &checkin, &other] {
            event_repo.append_event(event).await?;
        }

        let found = event_repo
            .bulk_find_checkout_events_by_tool_ids(&["PG-EVT-001".to_string()])
            .await?;
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, newer.id);
        assert_eq!(found[1].id, older.id);

        let none = event_repo.bulk_find_checkout_events_by_tool_ids(&[]).await?;
        assert!(none.is_empty());

        Ok(())
    }
}
