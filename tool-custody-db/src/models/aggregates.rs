use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tool_custody_api::{InventoryCategory, StatusCount, UsageDay};

/// Tools per non-empty category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCountModel {
    pub category: String,
    pub total: i64,
    pub checked_out: i64,
}

impl From<&CategoryCountModel> for InventoryCategory {
    fn from(row: &CategoryCountModel) -> Self {
        InventoryCategory {
            category: row.category.clone(),
            total: row.total,
            checked_out: row.checked_out,
            in_stock: row.total - row.checked_out,
        }
    }
}

/// Tools per status label; `None` groups tools without a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCountModel {
    pub status: Option<String>,
    pub count: i64,
}

impl From<&StatusCountModel> for StatusCount {
    fn from(row: &StatusCountModel) -> Self {
        StatusCount {
            status: row.status.clone(),
            count: row.count,
        }
    }
}

/// Checkout events per UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCountModel {
    pub day: NaiveDate,
    pub count: i64,
}

impl From<&DailyCountModel> for UsageDay {
    fn from(row: &DailyCountModel) -> Self {
        UsageDay {
            day: row.day,
            count: row.count,
        }
    }
}
