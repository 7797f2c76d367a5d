use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tool_custody_api::{
    CalibrationReport, CalibrationRow, CustodyResult, EventSummary, InventoryCategory,
    InventoryReport, StatusCount, ToolHistoryView, ToolQuery, ToolSummary, UsageQuery,
    UsageReport, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT, MAX_TOOL_LIST_LIMIT,
};
use tool_custody_db::models::{CheckoutAction, ToolModel};
use tool_custody_db::repository::{CustodyReadModel, EventFilter, PageRequest, ToolFilter};
use tracing::debug;

use crate::calibration;
use crate::storage_failure;

fn text<const N: usize>(value: &Option<heapless::String<N>>) -> String {
    value.as_ref().map(|s| s.to_string()).unwrap_or_default()
}

pub(crate) fn calibration_row(tool: &ToolModel) -> CalibrationRow {
    CalibrationRow {
        tool_id_number: tool.tool_id.to_string(),
        tool_name: tool.name.to_string(),
        tool_location: text(&tool.location),
        category: text(&tool.category),
        tool_calibration_due: tool.calibration_due_str().to_string(),
        tool_status: text(&tool.status),
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn start_of_day(value: &Option<String>) -> Option<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(trimmed(value)?.as_str(), "%Y-%m-%d").ok()?;
    Some(day.and_time(NaiveTime::MIN).and_utc())
}

/// Last microsecond of the given day, so `date_to` includes the whole day.
fn end_of_day(value: &Option<String>) -> Option<DateTime<Utc>> {
    start_of_day(value).map(|start| start + Duration::days(1) - Duration::microseconds(1))
}

/// Translates the report query into a ledger filter. `None` means the query
/// names an action that no event can have.
fn usage_filter(query: &UsageQuery) -> Option<EventFilter> {
    let action = match trimmed(&query.action) {
        None => None,
        Some(action) => Some(CheckoutAction::from_str(&action).ok()?),
    };
    Some(EventFilter {
        from: start_of_day(&query.date_from),
        to: end_of_day(&query.date_to),
        username: trimmed(&query.username),
        tool_id: trimmed(&query.tool_id),
        action,
        limit: query.effective_limit(),
    })
}

/// Read-only reports over the custody read model.
pub struct ReportService<R: CustodyReadModel> {
    reader: Arc<R>,
}

impl<R: CustodyReadModel> ReportService<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }

    pub async fn usage(&self, query: &UsageQuery) -> CustodyResult<UsageReport> {
        let Some(filter) = usage_filter(query) else {
            debug!(action = ?query.action, "usage report for unknown action");
            return Ok(UsageReport {
                events: Vec::new(),
                count: 0,
            });
        };
        let events: Vec<EventSummary> = self
            .reader
            .find_events(&filter)
            .await
            .map_err(storage_failure)?
            .iter()
            .map(EventSummary::from)
            .collect();
        Ok(UsageReport {
            count: events.len(),
            events,
        })
    }

    pub async fn calibration(&self) -> CustodyResult<CalibrationReport> {
        self.calibration_on(Utc::now().date_naive()).await
    }

    /// Calibrated tools split into overdue and everything else, each ordered
    /// by due marker.
    pub async fn calibration_on(&self, today: NaiveDate) -> CustodyResult<CalibrationReport> {
        let tools = self
            .reader
            .list_calibrated_tools()
            .await
            .map_err(storage_failure)?;

        let (overdue, due_soon): (Vec<_>, Vec<_>) = tools
            .iter()
            .partition(|t| calibration::is_overdue(t.calibration_due_str(), today));
        let overdue: Vec<CalibrationRow> = overdue.into_iter().map(calibration_row).collect();
        let due_soon: Vec<CalibrationRow> = due_soon.into_iter().map(calibration_row).collect();

        Ok(CalibrationReport {
            overdue_count: overdue.len(),
            due_soon_count: due_soon.len(),
            overdue,
            due_soon,
        })
    }

    pub async fn inventory(&self) -> CustodyResult<InventoryReport> {
        let total = self.reader.count_tools().await.map_err(storage_failure)?;
        let checked_out = self
            .reader
            .count_checked_out()
            .await
            .map_err(storage_failure)?;
        let by_category = self
            .reader
            .category_breakdown()
            .await
            .map_err(storage_failure)?;
        let by_status = self
            .reader
            .status_breakdown()
            .await
            .map_err(storage_failure)?;

        Ok(InventoryReport {
            total,
            in_stock: total - checked_out,
            checked_out,
            by_category: by_category.iter().map(InventoryCategory::from).collect(),
            by_status: by_status.iter().map(StatusCount::from).collect(),
        })
    }

    /// Tools ordered by name, at most 100.
    pub async fn list_tools(&self, query: &ToolQuery) -> CustodyResult<Vec<ToolSummary>> {
        let filter = ToolFilter {
            status: trimmed(&query.status),
            checked_out: query.checked_out,
            limit: MAX_TOOL_LIST_LIMIT,
        };
        let tools = self
            .reader
            .list_tools(&filter)
            .await
            .map_err(storage_failure)?;
        Ok(tools.iter().map(ToolSummary::from).collect())
    }

    /// Most recent ledger events across all tools.
    pub async fn history(&self, limit: Option<usize>) -> CustodyResult<Vec<EventSummary>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).min(MAX_HISTORY_LIMIT);
        let events = self
            .reader
            .recent_events(limit)
            .await
            .map_err(storage_failure)?;
        Ok(events.iter().map(EventSummary::from).collect())
    }

    pub async fn tool_history(
        &self,
        tool_id: &str,
        page: PageRequest,
    ) -> CustodyResult<ToolHistoryView> {
        let tool_id = tool_id.trim();
        let page = self
            .reader
            .load_tool_history(tool_id, page.capped(MAX_HISTORY_LIMIT))
            .await
            .map_err(storage_failure)?;
        Ok(ToolHistoryView {
            tool_id_number: tool_id.to_string(),
            total: page.total,
            page_number: page.page_number(),
            total_pages: page.total_pages(),
            has_more: page.has_more(),
            events: page.items.iter().map(EventSummary::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{engine, seeded_ledger, CALIPER, HAMMER};
    use crate::transition::ToggleCommand;
    use chrono::TimeZone;
    use tool_custody_api::{CustodyError, ToggleAction};
    use tool_custody_db::fixtures::{create_calibrated_tool, create_test_tool};
    use tool_custody_db::models::CheckoutEventModel;
    use tool_custody_db::fixtures::heapless_truncated;
    use tool_custody_db::InMemoryLedger;
    use uuid::Uuid;

    fn service(ledger: &InMemoryLedger) -> ReportService<InMemoryLedger> {
        ReportService::new(Arc::new(ledger.clone()))
    }

    fn event(
        tool_id: &str,
        actor: &str,
        action: CheckoutAction,
        at: DateTime<Utc>,
    ) -> CheckoutEventModel {
        CheckoutEventModel {
            id: Uuid::new_v4(),
            tool_id: heapless_truncated(tool_id),
            tool_name: Some(heapless_truncated("Hammer")),
            actor: heapless_truncated(actor),
            action,
            event_time: at,
            job_reference: None,
            condition: None,
            return_by: None,
        }
    }

    fn history_ledger() -> InMemoryLedger {
        let ledger = seeded_ledger();
        let day = |d: u32, h: u32| Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap();
        ledger.import_event(event("T1", "alice", CheckoutAction::Checkout, day(1, 8)));
        ledger.import_event(event("T1", "alice", CheckoutAction::Checkin, day(1, 17)));
        ledger.import_event(event("CONS-HAM-001", "bob", CheckoutAction::Checkout, day(2, 9)));
        ledger.import_event(event("T1", "Alicia", CheckoutAction::Checkout, day(3, 23)));
        ledger.import_event(event("T1", "alicia", CheckoutAction::Checkin, day(4, 0)));
        ledger
    }

    #[tokio::test]
    async fn usage_date_bounds_cover_whole_days() {
        let report = service(&history_ledger())
            .usage(&UsageQuery {
                date_from: Some("2024-03-02".to_string()),
                date_to: Some("2024-03-03".to_string()),
                ..UsageQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(report.count, 2);
        // newest first
        assert_eq!(report.events[0].username, "Alicia");
        assert_eq!(report.events[1].username, "bob");
    }

    #[tokio::test]
    async fn usage_filters_by_substring_and_action() {
        let service = service(&history_ledger());
        let report = service
            .usage(&UsageQuery {
                username: Some(" ALI ".to_string()),
                action: Some("checkout".to_string()),
                ..UsageQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(report.count, 2);
        assert!(report.events.iter().all(|e| e.action == ToggleAction::Checkout));

        let by_tool = service
            .usage(&UsageQuery {
                tool_id: Some("ham".to_string()),
                ..UsageQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(by_tool.count, 1);
        assert_eq!(by_tool.events[0].tool_id_number, "CONS-HAM-001");
    }

    #[tokio::test]
    async fn usage_ignores_bad_dates_and_honours_limit() {
        let service = service(&history_ledger());
        let report = service
            .usage(&UsageQuery {
                date_from: Some("yesterday".to_string()),
                limit: Some(3),
                ..UsageQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(report.count, 3);

        let unknown = service
            .usage(&UsageQuery {
                action: Some("borrow".to_string()),
                ..UsageQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(unknown.count, 0);
    }

    #[tokio::test]
    async fn calibration_report_splits_overdue() {
        let ledger = seeded_ledger();
        let mut future = create_calibrated_tool("CAL-002", "Torque Wrench", "2999-01-01");
        future.category = Some(heapless_truncated("Torque"));
        ledger.insert_tool(future);

        let report = service(&ledger).calibration().await.unwrap();
        assert_eq!(report.overdue_count, 1);
        assert_eq!(report.overdue[0].tool_id_number, CALIPER);
        assert_eq!(report.due_soon_count, 1);
        assert_eq!(report.due_soon[0].category, "Torque");
        assert_eq!(report.due_soon[0].tool_status, "Available");
    }

    #[tokio::test]
    async fn inventory_counts_in_and_out() {
        let ledger = seeded_ledger();
        let mut wrench = create_test_tool("T2", "Wrench");
        wrench.category = Some(heapless_truncated("Hand Tools"));
        wrench.status = None;
        ledger.insert_tool(wrench);
        engine(&ledger)
            .toggle(ToggleCommand::new("alice", "A1", "T2"))
            .await
            .unwrap();

        let report = service(&ledger).inventory().await.unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.checked_out, 1);
        assert_eq!(report.in_stock, 2);
        assert_eq!(
            report.by_category,
            vec![InventoryCategory {
                category: "Hand Tools".to_string(),
                total: 1,
                checked_out: 1,
                in_stock: 0,
            }]
        );
        assert!(report.by_status.contains(&StatusCount {
            status: None,
            count: 1
        }));
    }

    #[tokio::test]
    async fn list_tools_filters_by_custody() {
        let ledger = seeded_ledger();
        engine(&ledger)
            .toggle(ToggleCommand::new("bob", "B2", HAMMER))
            .await
            .unwrap();
        let service = service(&ledger);

        let out = service
            .list_tools(&ToolQuery {
                checked_out: Some(true),
                ..ToolQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].checked_out_by.as_deref(), Some("bob"));

        let all = service.list_tools(&ToolQuery::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|t| t.tool_name.as_str()).collect();
        assert_eq!(names, vec!["Digital Caliper", "Hammer"]);
    }

    #[tokio::test]
    async fn tool_history_pages_newest_first() {
        let ledger = seeded_ledger();
        let base = Utc::now() - Duration::days(1);
        for i in 0..25 {
            let action = if i % 2 == 0 {
                CheckoutAction::Checkout
            } else {
                CheckoutAction::Checkin
            };
            ledger.import_event(event(HAMMER, "alice", action, base + Duration::minutes(i)));
        }
        let service = service(&ledger);

        let first = service
            .tool_history(HAMMER, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(first.total, 25);
        assert_eq!(first.events.len(), 20);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_more);
        assert_eq!(first.events[0].event_time, base + Duration::minutes(24));

        let second = service
            .tool_history(HAMMER, PageRequest::for_page(20, 2))
            .await
            .unwrap();
        assert_eq!(second.page_number, 2);
        assert_eq!(second.events.len(), 5);
        assert!(!second.has_more);

        let recent = service.history(Some(500)).await.unwrap();
        assert_eq!(recent.len(), 25);
        assert_eq!(service.history(None).await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn read_failures_surface_as_storage_errors() {
        let ledger = seeded_ledger();
        ledger.fail_reads(true);
        let err = service(&ledger).inventory().await.unwrap_err();
        assert!(matches!(err, CustodyError::Storage { .. }));
    }
}
