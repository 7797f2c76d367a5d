//! Calibration reminder digests. Delivery belongs to the caller.

use chrono::NaiveDate;
use tool_custody_api::{CalibrationConfig, CalibrationReminder, CustodyResult};
use tool_custody_db::models::ToolModel;
use tool_custody_db::repository::ToolAggregates;
use tracing::info;

use crate::calibration::{self, CalibrationStatus};
use crate::reports::calibration_row;
use crate::storage_failure;

pub fn build_reminder(
    tools: &[ToolModel],
    config: &CalibrationConfig,
    today: NaiveDate,
) -> CalibrationReminder {
    let mut reminder = CalibrationReminder::default();
    for tool in tools {
        match calibration::classify(tool.calibration_due_str(), today, config.remind_days) {
            CalibrationStatus::Overdue if config.remind_overdue => {
                reminder.overdue.push(calibration_row(tool))
            }
            CalibrationStatus::DueSoon => reminder.due_soon.push(calibration_row(tool)),
            _ => {}
        }
    }
    reminder
}

pub async fn calibration_reminder<R>(
    reader: &R,
    config: &CalibrationConfig,
    today: NaiveDate,
) -> CustodyResult<CalibrationReminder>
where
    R: ToolAggregates + ?Sized,
{
    let tools = reader
        .list_calibrated_tools()
        .await
        .map_err(storage_failure)?;
    let reminder = build_reminder(&tools, config, today);
    info!(
        overdue = reminder.overdue.len(),
        due_soon = reminder.due_soon.len(),
        window_days = config.remind_days,
        "calibration reminder prepared"
    );
    Ok(reminder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tool_custody_db::fixtures::{create_calibrated_tool, create_test_tool};
    use tool_custody_db::InMemoryLedger;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn tools() -> Vec<ToolModel> {
        vec![
            create_calibrated_tool("MIC-001", "Micrometer", "2024-05-01"),
            create_calibrated_tool("TQW-002", "Torque Wrench", "2024-06-20"),
            create_calibrated_tool("GAU-003", "Gauge", "2024-12-01"),
            create_calibrated_tool("BLK-004", "Gauge Block", "na"),
            create_test_tool("HAM-005", "Hammer"),
        ]
    }

    #[test]
    fn overdue_and_due_soon_are_split() {
        let reminder = build_reminder(&tools(), &CalibrationConfig::default(), today());
        assert_eq!(reminder.overdue.len(), 1);
        assert_eq!(reminder.overdue[0].tool_id_number, "MIC-001");
        assert_eq!(reminder.due_soon.len(), 1);
        assert_eq!(reminder.due_soon[0].tool_id_number, "TQW-002");
        assert_eq!(reminder.due_soon[0].tool_location, "Crib A");
    }

    #[test]
    fn overdue_can_be_left_out() {
        let config = CalibrationConfig {
            remind_overdue: false,
            ..CalibrationConfig::default()
        };
        let reminder = build_reminder(&tools(), &config, today());
        assert!(reminder.overdue.is_empty());
        assert_eq!(reminder.total(), 1);
    }

    #[test]
    fn wider_window_picks_up_later_dues() {
        let config = CalibrationConfig {
            remind_days: 365,
            ..CalibrationConfig::default()
        };
        let reminder = build_reminder(&tools(), &config, today());
        assert_eq!(reminder.due_soon.len(), 2);
    }

    #[tokio::test]
    async fn reminder_reads_calibrated_tools() {
        let ledger = InMemoryLedger::new();
        for tool in tools() {
            ledger.insert_tool(tool);
        }
        let reminder = calibration_reminder(&ledger, &CalibrationConfig::default(), today())
            .await
            .unwrap();
        assert_eq!(reminder.subject(), "Calibration Reminder: 1 overdue, 1 due soon");
    }
}
