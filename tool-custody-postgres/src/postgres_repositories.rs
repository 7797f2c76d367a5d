use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tool_custody_api::DatabaseConfig;
use tool_custody_db::repository::{CommitUnitOfWork, RepositoryError};
use tracing::{debug, info};

use postgres_unit_of_work::Executor;
use crate::read_model::PostgresReadModel;
use crate::repository::custody::{CustodyRepoFactory, PostgresCustodySession};

/// Entry point to the Postgres storage: opens units of work for the write
/// path and hands out the pool-backed read model.
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
    factory: Arc<CustodyRepoFactory>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            factory: CustodyRepoFactory::new(),
        }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;
        info!(max_connections = config.max_connections, "connected to custody database");
        Ok(Self::new(Arc::new(pool)))
    }

    pub fn pool(&self) -> &Arc<PgPool> {
        &self.pool
    }

    pub fn read_model(&self) -> PostgresReadModel {
        PostgresReadModel::new(self.pool.clone())
    }

    /// Create all custody repositories sharing a single transaction
    pub async fn begin_session(&self) -> Result<PostgresCustodySession, sqlx::Error> {
        let tx = self.pool.begin().await?;
        debug!("custody transaction started");
        Ok(PostgresCustodySession::new(&self.factory, Executor::new(tx)))
    }
}

#[async_trait]
impl CommitUnitOfWork for PostgresRepositories {
    type Session = PostgresCustodySession;

    async fn begin_unit_of_work(&self) -> Result<PostgresCustodySession, RepositoryError> {
        Ok(self.begin_session().await?)
    }
}
