use crate::repository::{BulkFindCheckoutEventsByToolIds, LedgerAggregates, ToolAggregates};

/// Everything the dashboard and reports read. Handles are cheap to clone and
/// owned by each aggregate task, so implementations must not borrow from a
/// caller's unit of work.
pub trait CustodyReadModel:
    ToolAggregates + LedgerAggregates + BulkFindCheckoutEventsByToolIds + 'static
{
}

impl<T> CustodyReadModel for T where
    T: ToolAggregates + LedgerAggregates + BulkFindCheckoutEventsByToolIds + 'static
{
}
