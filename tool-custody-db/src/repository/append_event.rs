use async_trait::async_trait;

use crate::models::checkout_event::CheckoutEventModel;
use crate::repository::RepositoryError;

/// Appends one event to the custody ledger. There is no update or delete
/// counterpart.
#[async_trait]
pub trait AppendEvent: Send + Sync {
    async fn append_event(
        &self,
        event: &CheckoutEventModel,
    ) -> Result<CheckoutEventModel, RepositoryError>;
}
