use async_trait::async_trait;

use crate::models::actor::ActorModel;
use crate::repository::RepositoryError;

/// Looks up an actor by its unique username.
///
/// # Returns
/// * `Ok(Some(ActorModel))` - The actor
/// * `Ok(None)` - If no actor has that username
/// * `Err` - An error if the query could not be executed
#[async_trait]
pub trait FindActorByUsername: Send + Sync {
    async fn find_actor_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ActorModel>, RepositoryError>;
}
