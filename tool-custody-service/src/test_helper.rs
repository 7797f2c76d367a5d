//! Seeded in-memory ledgers shared by the service tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tool_custody_api::CoordinatorConfig;
use tool_custody_db::fixtures::{create_calibrated_tool, create_test_actor, create_test_tool};
use tool_custody_db::InMemoryLedger;

use crate::coordinator::QueryCoordinator;
use crate::transition::TransitionEngine;

pub const HAMMER: &str = "T1";
pub const CALIPER: &str = "CAL-001";

/// alice/A1 and bob/B2, an in-stock hammer and a caliper whose calibration
/// fell due yesterday.
pub fn seeded_ledger() -> InMemoryLedger {
    let ledger = InMemoryLedger::new();
    ledger.insert_actor(create_test_actor("alice", "A1"));
    ledger.insert_actor(create_test_actor("bob", "B2"));
    ledger.insert_tool(create_test_tool(HAMMER, "Hammer"));

    let yesterday = (Utc::now().date_naive() - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();
    ledger.insert_tool(create_calibrated_tool(CALIPER, "Digital Caliper", &yesterday));
    ledger
}

pub fn engine(ledger: &InMemoryLedger) -> TransitionEngine<InMemoryLedger> {
    TransitionEngine::new(Arc::new(ledger.clone()))
}

pub fn coordinator(max_workers: usize) -> Arc<QueryCoordinator> {
    QueryCoordinator::start(&CoordinatorConfig {
        enabled: true,
        max_workers,
        task_timeout: None,
    })
}
