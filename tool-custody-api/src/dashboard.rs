use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::toggle::ToggleAction;

/// One ledger entry as shown in activity feeds and usage reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_time: DateTime<Utc>,
    pub action: ToggleAction,
    pub tool_id_number: String,
    pub tool_name: String,
    pub username: String,
    pub job_id: Option<String>,
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_by: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDay {
    pub day: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationBucketCount {
    pub label: String,
    pub count: usize,
    pub color: String,
}

/// A checked-out tool whose latest checkout has passed its return deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueReturn {
    pub tool_id_number: String,
    pub tool_name: String,
    pub username: String,
    pub return_by: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub total_tools: i64,
    pub checked_out: i64,
    pub in_stock: i64,
    pub calibration_overdue: usize,
    pub recent_events: Vec<EventSummary>,
    pub category_breakdown: Vec<CategoryCount>,
    pub categories: Vec<String>,
    pub usage_trend: Vec<UsageDay>,
    pub max_usage: i64,
    pub calibration_summary: Vec<CalibrationBucketCount>,
    pub overdue_returns: Vec<OverdueReturn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsView {
    pub total_tools: i64,
    pub checked_out: i64,
    pub in_stock: i64,
    pub calibrated_tools: usize,
    pub calibration_overdue: usize,
}
