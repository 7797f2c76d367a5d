use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use tool_custody_db::models::tool::ToolModel;

pub struct ToolRepositoryImpl {
    pub executor: Executor,
}

impl ToolRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ToolModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ToolModel {
            id: row.try_get("id")?,
            tool_id: get_heapless_string(row, "tool_id")?,
            name: get_heapless_string(row, "name")?,
            location: get_optional_heapless_string(row, "location")?,
            category: get_optional_heapless_string(row, "category")?,
            status: get_optional_heapless_string(row, "status")?,
            held_by: get_optional_heapless_string(row, "held_by")?,
            checkout_time: row.try_get("checkout_time")?,
            checkin_time: row.try_get("checkin_time")?,
            calibration_due: get_optional_heapless_string(row, "calibration_due")?,
            calibration_date: get_optional_heapless_string(row, "calibration_date")?,
            calibration_cert: get_optional_heapless_string(row, "calibration_cert")?,
            calibration_schedule: get_optional_heapless_string(row, "calibration_schedule")?,
        })
    }
}
