pub mod calibration;
pub mod coordinator;
pub mod dashboard;
pub mod endpoint;
pub mod observability;
pub mod overdue;
pub mod reminders;
pub mod reports;
pub mod transition;

pub use coordinator::{read_task, QueryCoordinator, ReadTask, TaskFailure};
pub use dashboard::DashboardService;
pub use endpoint::{handle_toggle, handle_toggle_request, ToggleReply};
pub use observability::init_tracing;
pub use overdue::compute_overdue_returns;
pub use reminders::{build_reminder, calibration_reminder};
pub use reports::ReportService;
pub use transition::{CustodyWarning, ToggleCommand, ToggleOutcome, TransitionEngine};

use tool_custody_api::CustodyError;
use tool_custody_db::repository::RepositoryError;
use tracing::error;

/// Logs a storage error and wraps it; callers only ever see the generic message.
pub(crate) fn storage_failure(source: impl Into<RepositoryError>) -> CustodyError {
    let source = source.into();
    error!(error = %source, "custody storage failure");
    CustodyError::storage(source)
}

#[cfg(test)]
pub mod test_helper;
