use async_trait::async_trait;
use tool_custody_db::models::{ActorModel, CheckoutEventModel, ToolModel};
use tool_custody_db::repository::{
    AppendEvent, BulkFindCheckoutEventsByToolIds, CustodySession, FindActorByUsername,
    FindToolById, RepositoryError, UpdateToolCustody,
};
use tracing::debug;

use postgres_unit_of_work::Executor;
use super::factory::{CustodyRepoFactory, CustodyRepositories};

const TRANSACTION_CONSUMED: &str = "Transaction has been consumed";

/// A unit of work backed by one Postgres transaction.
///
/// Dropping the session without committing rolls the transaction back.
pub struct PostgresCustodySession {
    executor: Executor,
    repos: CustodyRepositories,
}

impl PostgresCustodySession {
    pub fn new(factory: &CustodyRepoFactory, executor: Executor) -> Self {
        let repos = factory.build_all_repos(&executor);
        Self { executor, repos }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn repos(&self) -> &CustodyRepositories {
        &self.repos
    }
}

#[async_trait]
impl FindActorByUsername for PostgresCustodySession {
    async fn find_actor_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ActorModel>, RepositoryError> {
        self.repos.actor_repository.find_actor_by_username(username).await
    }
}

#[async_trait]
impl FindToolById for PostgresCustodySession {
    async fn find_tool_by_id(&self, tool_id: &str) -> Result<Option<ToolModel>, RepositoryError> {
        self.repos.tool_repository.find_tool_by_id(tool_id).await
    }
}

#[async_trait]
impl UpdateToolCustody for PostgresCustodySession {
    async fn update_tool_custody(&self, tool: &ToolModel) -> Result<(), RepositoryError> {
        self.repos.tool_repository.update_tool_custody(tool).await
    }
}

#[async_trait]
impl AppendEvent for PostgresCustodySession {
    async fn append_event(
        &self,
        event: &CheckoutEventModel,
    ) -> Result<CheckoutEventModel, RepositoryError> {
        self.repos.checkout_event_repository.append_event(event).await
    }
}

#[async_trait]
impl BulkFindCheckoutEventsByToolIds for PostgresCustodySession {
    async fn bulk_find_checkout_events_by_tool_ids(
        &self,
        tool_ids: &[String],
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError> {
        self.repos
            .checkout_event_repository
            .bulk_find_checkout_events_by_tool_ids(tool_ids)
            .await
    }
}

#[async_trait]
impl CustodySession for PostgresCustodySession {
    async fn commit_unit_of_work(&self) -> Result<(), RepositoryError> {
        let tx = self.executor.tx.lock().await.take();
        tx.ok_or(TRANSACTION_CONSUMED)?.commit().await?;
        debug!("custody transaction committed");
        Ok(())
    }

    async fn rollback_unit_of_work(&self) -> Result<(), RepositoryError> {
        let tx = self.executor.tx.lock().await.take();
        tx.ok_or(TRANSACTION_CONSUMED)?.rollback().await?;
        debug!("custody transaction rolled back");
        Ok(())
    }
}
