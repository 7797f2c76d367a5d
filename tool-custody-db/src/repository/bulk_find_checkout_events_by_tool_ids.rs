use async_trait::async_trait;

use crate::models::checkout_event::CheckoutEventModel;
use crate::repository::RepositoryError;

/// Retrieves every `checkout` event of the given tools in a single round trip.
///
/// # Returns
/// Events ordered by `event_time` descending, so the first event seen for a
/// tool is its most recent checkout. An empty id slice yields an empty vector.
#[async_trait]
pub trait BulkFindCheckoutEventsByToolIds: Send + Sync {
    async fn bulk_find_checkout_events_by_tool_ids(
        &self,
        tool_ids: &[String],
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError>;
}
