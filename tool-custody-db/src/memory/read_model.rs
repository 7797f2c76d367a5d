use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

use crate::memory::ledger::InMemoryLedger;
use crate::models::{
    CategoryCountModel, CheckoutEventModel, DailyCountModel, StatusCountModel, ToolModel,
};
use crate::repository::{
    BulkFindCheckoutEventsByToolIds, EventFilter, LedgerAggregates, Page, PageRequest,
    RepositoryError, ToolAggregates, ToolFilter,
};

/// Orders events by `event_time` descending. Events with equal timestamps
/// keep reverse append order, so the later append wins.
pub(crate) fn latest_first<'a>(
    events: impl Iterator<Item = &'a CheckoutEventModel>,
) -> Vec<CheckoutEventModel> {
    let mut out: Vec<CheckoutEventModel> = events.cloned().collect();
    out.reverse();
    out.sort_by(|a, b| b.event_time.cmp(&a.event_time));
    out
}

fn has_calibration_due(tool: &ToolModel) -> bool {
    tool.calibration_due
        .as_ref()
        .is_some_and(|due| !due.trim().is_empty() && due.as_str() != "N/A")
}

#[async_trait]
impl ToolAggregates for InMemoryLedger {
    async fn count_tools(&self) -> Result<i64, RepositoryError> {
        Ok(self.read_state()?.tools.len() as i64)
    }

    async fn count_checked_out(&self) -> Result<i64, RepositoryError> {
        let state = self.read_state()?;
        Ok(state.tools.values().filter(|t| t.is_checked_out()).count() as i64)
    }

    async fn list_checked_out_tools(&self) -> Result<Vec<ToolModel>, RepositoryError> {
        let state = self.read_state()?;
        // BTreeMap iteration is already ordered by tool_id
        Ok(state
            .tools
            .values()
            .filter(|t| t.is_checked_out())
            .cloned()
            .collect())
    }

    async fn list_calibrated_tools(&self) -> Result<Vec<ToolModel>, RepositoryError> {
        let state = self.read_state()?;
        let mut tools: Vec<ToolModel> = state
            .tools
            .values()
            .filter(|t| has_calibration_due(t))
            .cloned()
            .collect();
        tools.sort_by(|a, b| {
            a.calibration_due_str()
                .cmp(b.calibration_due_str())
                .then_with(|| a.tool_id.cmp(&b.tool_id))
        });
        Ok(tools)
    }

    async fn list_tools(&self, filter: &ToolFilter) -> Result<Vec<ToolModel>, RepositoryError> {
        let state = self.read_state()?;
        let mut tools: Vec<ToolModel> = state
            .tools
            .values()
            .filter(|t| match &filter.status {
                Some(status) => t.status.as_ref().is_some_and(|s| s.as_str() == status),
                None => true,
            })
            .filter(|t| match filter.checked_out {
                Some(flag) => t.is_checked_out() == flag,
                None => true,
            })
            .cloned()
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.tool_id.cmp(&b.tool_id)));
        tools.truncate(filter.limit);
        Ok(tools)
    }

    async fn category_breakdown(&self) -> Result<Vec<CategoryCountModel>, RepositoryError> {
        let state = self.read_state()?;
        let mut by_category: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for tool in state.tools.values() {
            let Some(category) = tool.category.as_ref().filter(|c| !c.is_empty()) else {
                continue;
            };
            let entry = by_category.entry(category.to_string()).or_default();
            entry.0 += 1;
            if tool.is_checked_out() {
                entry.1 += 1;
            }
        }
        let mut rows: Vec<CategoryCountModel> = by_category
            .into_iter()
            .map(|(category, (total, checked_out))| CategoryCountModel {
                category,
                total,
                checked_out,
            })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
        Ok(rows)
    }

    async fn status_breakdown(&self) -> Result<Vec<StatusCountModel>, RepositoryError> {
        let state = self.read_state()?;
        let mut labelled: BTreeMap<String, i64> = BTreeMap::new();
        let mut unlabelled = 0;
        for tool in state.tools.values() {
            match &tool.status {
                Some(status) => *labelled.entry(status.to_string()).or_default() += 1,
                None => unlabelled += 1,
            }
        }
        let mut rows: Vec<StatusCountModel> = labelled
            .into_iter()
            .map(|(status, count)| StatusCountModel {
                status: Some(status),
                count,
            })
            .collect();
        if unlabelled > 0 {
            rows.push(StatusCountModel {
                status: None,
                count: unlabelled,
            });
        }
        Ok(rows)
    }
}

#[async_trait]
impl LedgerAggregates for InMemoryLedger {
    async fn recent_events(
        &self,
        limit: usize,
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError> {
        let state = self.read_state()?;
        let mut events = latest_first(state.events.iter());
        events.truncate(limit);
        Ok(events)
    }

    async fn checkout_trend_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCountModel>, RepositoryError> {
        let state = self.read_state()?;
        let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for event in state
            .events
            .iter()
            .filter(|e| e.is_checkout() && e.event_time >= since)
        {
            *per_day.entry(event.event_time.date_naive()).or_default() += 1;
        }
        Ok(per_day
            .into_iter()
            .map(|(day, count)| DailyCountModel { day, count })
            .collect())
    }

    async fn find_events(
        &self,
        filter: &EventFilter,
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError> {
        let state = self.read_state()?;
        let mut events = latest_first(state.events.iter().filter(|e| filter.matches(e)));
        events.truncate(filter.limit);
        Ok(events)
    }

    async fn load_tool_history(
        &self,
        tool_id: &str,
        page: PageRequest,
    ) -> Result<Page<CheckoutEventModel>, RepositoryError> {
        let state = self.read_state()?;
        let events = latest_first(state.events.iter().filter(|e| e.tool_id.as_str() == tool_id));
        Ok(Page::from_ordered(events, page))
    }
}

#[async_trait]
impl BulkFindCheckoutEventsByToolIds for InMemoryLedger {
    async fn bulk_find_checkout_events_by_tool_ids(
        &self,
        tool_ids: &[String],
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError> {
        if tool_ids.is_empty() {
            return Ok(Vec::new());
        }
        let state = self.read_state()?;
        Ok(latest_first(state.events.iter().filter(|e| {
            e.is_checkout() && tool_ids.iter().any(|id| id == e.tool_id.as_str())
        })))
    }
}
