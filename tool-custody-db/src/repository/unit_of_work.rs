use async_trait::async_trait;

use crate::repository::{
    AppendEvent, BulkFindCheckoutEventsByToolIds, FindActorByUsername, FindToolById,
    RepositoryError, UpdateToolCustody,
};

/// Repositories bound to one open unit of work.
///
/// Nothing written through a session is visible to other sessions until
/// `commit_unit_of_work` succeeds. A session is single-use: after commit or
/// rollback every further call fails.
#[async_trait]
pub trait CustodySession:
    FindActorByUsername
    + FindToolById
    + UpdateToolCustody
    + AppendEvent
    + BulkFindCheckoutEventsByToolIds
{
    async fn commit_unit_of_work(&self) -> Result<(), RepositoryError>;

    async fn rollback_unit_of_work(&self) -> Result<(), RepositoryError>;
}

/// Entry point of the write path: opens a fresh unit of work per toggle.
#[async_trait]
pub trait CommitUnitOfWork: Send + Sync {
    type Session: CustodySession + 'static;

    async fn begin_unit_of_work(&self) -> Result<Self::Session, RepositoryError>;
}
