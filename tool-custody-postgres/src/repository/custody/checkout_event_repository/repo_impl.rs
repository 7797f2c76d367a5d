use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use tool_custody_db::models::checkout_event::{CheckoutAction, CheckoutEventModel, ToolCondition};

pub struct CheckoutEventRepositoryImpl {
    pub executor: Executor,
}

impl CheckoutEventRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for CheckoutEventModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(CheckoutEventModel {
            id: row.try_get("id")?,
            tool_id: get_heapless_string(row, "tool_id")?,
            tool_name: get_optional_heapless_string(row, "tool_name")?,
            actor: get_heapless_string(row, "actor")?,
            action: row.try_get::<CheckoutAction, _>("action")?,
            event_time: row.try_get("event_time")?,
            job_reference: get_optional_heapless_string(row, "job_reference")?,
            condition: row.try_get::<Option<ToolCondition>, _>("condition")?,
            return_by: row.try_get("return_by")?,
        })
    }
}
