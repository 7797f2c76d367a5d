use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, TryFromRow};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use tool_custody_db::models::actor::{ActorModel, ActorRole};

pub struct ActorRepositoryImpl {
    pub executor: Executor,
}

impl ActorRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ActorModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ActorModel {
            id: row.try_get("id")?,
            username: get_heapless_string(row, "username")?,
            badge_id: get_heapless_string(row, "badge_id")?,
            first_name: get_heapless_string(row, "first_name")?,
            last_name: get_heapless_string(row, "last_name")?,
            department: get_heapless_string(row, "department")?,
            role: row.try_get::<ActorRole, _>("role")?,
        })
    }
}
