use serde::{Deserialize, Serialize};

use crate::dashboard::EventSummary;

pub const DEFAULT_USAGE_LIMIT: usize = 500;
pub const MAX_USAGE_LIMIT: usize = 2000;
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 100;
pub const MAX_TOOL_LIST_LIMIT: usize = 100;

/// Filters of the usage report. Dates are `YYYY-MM-DD`; unparseable dates
/// are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageQuery {
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub tool_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl UsageQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_USAGE_LIMIT).min(MAX_USAGE_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub events: Vec<EventSummary>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationRow {
    pub tool_id_number: String,
    pub tool_name: String,
    pub tool_location: String,
    pub category: String,
    pub tool_calibration_due: String,
    pub tool_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub overdue: Vec<CalibrationRow>,
    pub due_soon: Vec<CalibrationRow>,
    pub overdue_count: usize,
    pub due_soon_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCategory {
    pub category: String,
    pub total: i64,
    pub checked_out: i64,
    pub in_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryReport {
    pub total: i64,
    pub in_stock: i64,
    pub checked_out: i64,
    pub by_category: Vec<InventoryCategory>,
    pub by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolQuery {
    #[serde(default)]
    pub status: Option<String>,
    /// `Some(true)` lists only checked-out tools, `Some(false)` only tools in stock.
    #[serde(default)]
    pub checked_out: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub tool_id_number: String,
    pub tool_name: String,
    pub tool_location: Option<String>,
    pub tool_status: Option<String>,
    pub checked_out_by: Option<String>,
    pub tool_calibration_due: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolHistoryView {
    pub tool_id_number: String,
    pub events: Vec<EventSummary>,
    pub total: usize,
    pub page_number: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

/// Tools to mention in a calibration reminder. Delivery is left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationReminder {
    pub overdue: Vec<CalibrationRow>,
    pub due_soon: Vec<CalibrationRow>,
}

impl CalibrationReminder {
    pub fn total(&self) -> usize {
        self.overdue.len() + self.due_soon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn subject(&self) -> String {
        format!(
            "Calibration Reminder: {} overdue, {} due soon",
            self.overdue.len(),
            self.due_soon.len()
        )
    }

    /// Plain-text digest, one line per tool.
    pub fn plain_text(&self, base_url: Option<&str>) -> String {
        let mut lines = vec!["Calibration Reminder".to_string(), String::new()];
        for (heading, rows) in [("Overdue:", &self.overdue), ("Due soon:", &self.due_soon)] {
            if rows.is_empty() {
                continue;
            }
            lines.push(heading.to_string());
            for row in rows {
                lines.push(format!(
                    "  - {} | {} | Due: {}",
                    row.tool_id_number, row.tool_name, row.tool_calibration_due
                ));
            }
            lines.push(String::new());
        }
        if let Some(base_url) = base_url {
            lines.push(format!("View full report: {}/reports", base_url.trim_end_matches('/')));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, due: &str) -> CalibrationRow {
        CalibrationRow {
            tool_id_number: id.to_string(),
            tool_name: format!("{id} name"),
            tool_location: String::new(),
            category: String::new(),
            tool_calibration_due: due.to_string(),
            tool_status: String::new(),
        }
    }

    #[test]
    fn usage_limit_is_capped() {
        let mut query = UsageQuery::default();
        assert_eq!(query.effective_limit(), DEFAULT_USAGE_LIMIT);
        query.limit = Some(10_000);
        assert_eq!(query.effective_limit(), MAX_USAGE_LIMIT);
    }

    #[test]
    fn reminder_digest_lists_each_section() {
        let reminder = CalibrationReminder {
            overdue: vec![row("MIC-001", "2020-01-01")],
            due_soon: vec![row("TQW-002", "2030-01-01")],
        };
        assert_eq!(reminder.subject(), "Calibration Reminder: 1 overdue, 1 due soon");
        let body = reminder.plain_text(Some("http://crib.local/"));
        assert!(body.contains("Overdue:\n  - MIC-001 | MIC-001 name | Due: 2020-01-01"));
        assert!(body.contains("Due soon:\n  - TQW-002"));
        assert!(body.ends_with("View full report: http://crib.local/reports"));
    }

    #[test]
    fn empty_reminder_has_no_sections() {
        let reminder = CalibrationReminder::default();
        assert!(reminder.is_empty());
        assert!(!reminder.plain_text(None).contains("Overdue"));
    }
}
