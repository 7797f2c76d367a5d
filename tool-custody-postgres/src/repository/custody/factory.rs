use std::sync::Arc;

use postgres_unit_of_work::Executor;
use super::{
    actor_repository::ActorRepositoryImpl,
    checkout_event_repository::CheckoutEventRepositoryImpl,
    tool_repository::ToolRepositoryImpl,
};

/// Builds the custody repositories on top of one executor.
#[derive(Default)]
pub struct CustodyRepoFactory {}

impl CustodyRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_actor_repo(&self, executor: &Executor) -> Arc<ActorRepositoryImpl> {
        Arc::new(ActorRepositoryImpl::new(executor.clone()))
    }

    pub fn build_tool_repo(&self, executor: &Executor) -> Arc<ToolRepositoryImpl> {
        Arc::new(ToolRepositoryImpl::new(executor.clone()))
    }

    pub fn build_checkout_event_repo(
        &self,
        executor: &Executor,
    ) -> Arc<CheckoutEventRepositoryImpl> {
        Arc::new(CheckoutEventRepositoryImpl::new(executor.clone()))
    }

    pub fn build_all_repos(&self, executor: &Executor) -> CustodyRepositories {
        CustodyRepositories {
            actor_repository: self.build_actor_repo(executor),
            tool_repository: self.build_tool_repo(executor),
            checkout_event_repository: self.build_checkout_event_repo(executor),
        }
    }
}

/// Container for all custody repositories of one unit of work
pub struct CustodyRepositories {
    pub actor_repository: Arc<ActorRepositoryImpl>,
    pub tool_repository: Arc<ToolRepositoryImpl>,
    pub checkout_event_repository: Arc<CheckoutEventRepositoryImpl>,
}
