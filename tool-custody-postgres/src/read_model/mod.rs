pub mod bulk_find;
pub mod ledger_aggregates;
pub mod tool_aggregates;

use sqlx::PgPool;
use std::sync::Arc;

/// Read-only aggregates served straight from the pool, outside any unit of
/// work. Each query checks out its own connection.
#[derive(Clone)]
pub struct PostgresReadModel {
    pub pool: Arc<PgPool>,
}

impl PostgresReadModel {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}
