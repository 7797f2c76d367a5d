use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::aggregates::DailyCountModel;
use crate::models::checkout_event::{CheckoutAction, CheckoutEventModel};
use crate::repository::pagination::{Page, PageRequest};
use crate::repository::RepositoryError;

/// Filters of the event search. Both time bounds are inclusive; `username`
/// and `tool_id` match case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub username: Option<String>,
    pub tool_id: Option<String>,
    pub action: Option<CheckoutAction>,
    pub limit: usize,
}

impl EventFilter {
    /// In-process predicate equivalent to the SQL filter, limit excluded.
    pub fn matches(&self, event: &CheckoutEventModel) -> bool {
        if self.from.is_some_and(|from| event.event_time < from) {
            return false;
        }
        if self.to.is_some_and(|to| event.event_time > to) {
            return false;
        }
        if let Some(action) = self.action {
            if event.action != action {
                return false;
            }
        }
        contains_ignore_case(event.actor.as_str(), self.username.as_deref())
            && contains_ignore_case(event.tool_id.as_str(), self.tool_id.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Read-only aggregates over the custody ledger. Every listing is ordered by
/// `event_time` descending.
#[async_trait]
pub trait LedgerAggregates: Send + Sync {
    async fn recent_events(&self, limit: usize) -> Result<Vec<CheckoutEventModel>, RepositoryError>;

    /// Checkouts per UTC day at or after `since`, ascending by day. Days
    /// without checkouts are omitted.
    async fn checkout_trend_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCountModel>, RepositoryError>;

    async fn find_events(
        &self,
        filter: &EventFilter,
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError>;

    async fn load_tool_history(
        &self,
        tool_id: &str,
        page: PageRequest,
    ) -> Result<Page<CheckoutEventModel>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use heapless::String as HeaplessString;
    use std::str::FromStr;
    use uuid::Uuid;

    fn event(actor: &str, tool_id: &str, action: CheckoutAction, day: u32) -> CheckoutEventModel {
        CheckoutEventModel {
            id: Uuid::new_v4(),
            tool_id: HeaplessString::from_str(tool_id).unwrap(),
            tool_name: None,
            actor: HeaplessString::from_str(actor).unwrap(),
            action,
            event_time: Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
            job_reference: None,
            condition: None,
            return_by: None,
        }
    }

    #[test]
    fn filter_matches_substrings_case_insensitively() {
        let filter = EventFilter {
            username: Some("ALI".to_string()),
            tool_id: Some("ham".to_string()),
            ..EventFilter::default()
        };
        assert!(filter.matches(&event("alice", "CONS-HAM-001", CheckoutAction::Checkout, 3)));
        assert!(!filter.matches(&event("bob", "CONS-HAM-001", CheckoutAction::Checkout, 3)));
    }

    #[test]
    fn filter_bounds_are_inclusive() {
        let e = event("alice", "T1", CheckoutAction::Checkin, 3);
        let filter = EventFilter {
            from: Some(e.event_time),
            to: Some(e.event_time),
            action: Some(CheckoutAction::Checkin),
            ..EventFilter::default()
        };
        assert!(filter.matches(&e));

        let checkout_only = EventFilter {
            action: Some(CheckoutAction::Checkout),
            ..EventFilter::default()
        };
        assert!(!checkout_only.matches(&e));
    }
}
