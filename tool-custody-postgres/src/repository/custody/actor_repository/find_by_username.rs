use async_trait::async_trait;
use tool_custody_db::models::actor::ActorModel;
use tool_custody_db::repository::{FindActorByUsername, RepositoryError};
use crate::utils::TryFromRow;

use super::repo_impl::ActorRepositoryImpl;

impl ActorRepositoryImpl {
    pub(super) async fn find_by_username_impl(
        repo: &ActorRepositoryImpl,
        username: &str,
    ) -> Result<Option<ActorModel>, RepositoryError> {
        let query = sqlx::query(r#"SELECT * FROM actor WHERE username = $1"#).bind(username);
        let row = {
            let mut tx = repo.executor.tx.lock().await;
            if let Some(transaction) = tx.as_mut() {
                query.fetch_optional(&mut **transaction).await?
            } else {
                return Err("Transaction has been consumed".into());
            }
        };

        row.as_ref().map(ActorModel::try_from_row).transpose()
    }
}

#[async_trait]
impl FindActorByUsername for ActorRepositoryImpl {
    async fn find_actor_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ActorModel>, RepositoryError> {
        Self::find_by_username_impl(self, username).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::TestError;
    use crate::test_helper::setup_test_context;
    use super::super::super::test_utils::test_utils::insert_actor;
    use tool_custody_db::fixtures::create_test_actor;
    use tool_custody_db::repository::FindActorByUsername;

    #[tokio::test]
    #[ignore]
    async fn test_find_by_username() -> Result<(), TestError> {
        let ctx = setup_test_context().await?;
        let actor_repo = &ctx.custody_repos().actor_repository;

        let actor = create_test_actor("pg-find-actor", "PGA1");
        insert_actor(&actor_repo.executor, &actor).await?;

        let found = actor_repo.find_actor_by_username("pg-find-actor").await?;
        assert_eq!(found, Some(actor));

        let missing = actor_repo.find_actor_by_username("pg-nobody").await?;
        assert!(missing.is_none());

        Ok(())
    }
}
