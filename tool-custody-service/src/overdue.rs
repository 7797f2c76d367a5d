use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tool_custody_api::OverdueReturn;
use tool_custody_db::models::{CheckoutEventModel, ToolModel};
use tool_custody_db::repository::{BulkFindCheckoutEventsByToolIds, RepositoryError};

/// Checked-out tools whose latest checkout is past its `return_by`.
///
/// Issues a single bulk query for all tools and none at all when nothing is
/// checked out.
pub async fn compute_overdue_returns<R>(
    reader: &R,
    tools: &[ToolModel],
    now: DateTime<Utc>,
) -> Result<Vec<OverdueReturn>, RepositoryError>
where
    R: BulkFindCheckoutEventsByToolIds + ?Sized,
{
    let tool_ids: Vec<String> = tools
        .iter()
        .filter(|tool| tool.is_checked_out())
        .map(|tool| tool.tool_id.to_string())
        .collect();
    if tool_ids.is_empty() {
        return Ok(Vec::new());
    }

    let events = reader.bulk_find_checkout_events_by_tool_ids(&tool_ids).await?;
    Ok(overdue_from_events(tools, &events, now))
}

/// `events` must be ordered by `event_time` descending.
pub fn overdue_from_events(
    tools: &[ToolModel],
    events: &[CheckoutEventModel],
    now: DateTime<Utc>,
) -> Vec<OverdueReturn> {
    let mut latest: HashMap<&str, &CheckoutEventModel> = HashMap::with_capacity(tools.len());
    for event in events.iter().filter(|e| e.is_checkout()) {
        latest.entry(event.tool_id.as_str()).or_insert(event);
    }

    let mut overdue: Vec<OverdueReturn> = tools
        .iter()
        .filter_map(|tool| {
            let holder = tool.held_by.as_ref()?;
            let event = latest.get(tool.tool_id.as_str())?;
            let return_by = event.return_by.filter(|deadline| *deadline < now)?;
            Some(OverdueReturn {
                tool_id_number: tool.tool_id.to_string(),
                tool_name: tool.name.to_string(),
                username: holder.to_string(),
                return_by,
            })
        })
        .collect();

    overdue.sort_by(|a, b| {
        a.return_by
            .cmp(&b.return_by)
            .then_with(|| a.tool_id_number.cmp(&b.tool_id_number))
    });
    overdue
}
