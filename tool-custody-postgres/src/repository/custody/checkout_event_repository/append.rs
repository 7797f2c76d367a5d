use async_trait::async_trait;
use tool_custody_db::models::checkout_event::CheckoutEventModel;
use tool_custody_db::repository::{AppendEvent, RepositoryError};

use super::repo_impl::CheckoutEventRepositoryImpl;

impl CheckoutEventRepositoryImpl {
    pub(super) async fn append_impl(
        repo: &CheckoutEventRepositoryImpl,
        event: &CheckoutEventModel,
    ) -> Result<CheckoutEventModel, RepositoryError> {
        let query = sqlx::query(
            r#"
            INSERT INTO checkout_event (
                id, tool_id, tool_name, actor, action, event_time,
                job_reference, condition, return_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id)
        .bind(event.tool_id.as_str())
        .bind(event.tool_name.as_ref().map(|s| s.as_str()))
        .bind(event.actor.as_str())
        .bind(event.action)
        .bind(event.event_time)
        .bind(event.job_reference.as_ref().map(|s| s.as_str()))
        .bind(event.condition)
        .bind(event.return_by);

        {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            query.execute(&mut **transaction).await?;
        }

        Ok(event.clone())
    }
}

#[async_trait]
impl AppendEvent for CheckoutEventRepositoryImpl {
    async fn append_event(
        &self,
        event: &CheckoutEventModel,
    ) -> Result<CheckoutEventModel, RepositoryError> {
        Self::append_impl(self, event).await
    }
}
