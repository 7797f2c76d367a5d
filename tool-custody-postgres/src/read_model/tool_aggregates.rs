use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder, Row};
use tool_custody_db::models::{CategoryCountModel, StatusCountModel, ToolModel};
use tool_custody_db::repository::{RepositoryError, ToolAggregates, ToolFilter};

use super::PostgresReadModel;
use crate::utils::rows_into;

#[async_trait]
impl ToolAggregates for PostgresReadModel {
    async fn count_tools(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tool")
            .fetch_one(&*self.pool)
            .await?;
        Ok(count)
    }

    async fn count_checked_out(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tool WHERE held_by IS NOT NULL",
        )
        .fetch_one(&*self.pool)
        .await?;
        Ok(count)
    }

    async fn list_checked_out_tools(&self) -> Result<Vec<ToolModel>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM tool WHERE held_by IS NOT NULL ORDER BY tool_id")
            .fetch_all(&*self.pool)
            .await?;
        rows_into(&rows)
    }

    async fn list_calibrated_tools(&self) -> Result<Vec<ToolModel>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM tool
            WHERE calibration_due IS NOT NULL
              AND calibration_due <> 'N/A'
              AND btrim(calibration_due) <> ''
            ORDER BY calibration_due, tool_id
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;
        rows_into(&rows)
    }

    async fn list_tools(&self, filter: &ToolFilter) -> Result<Vec<ToolModel>, RepositoryError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM tool WHERE TRUE");
        if let Some(status) = &filter.status {
            builder.push(" AND status = ").push_bind(status.clone());
        }
        match filter.checked_out {
            Some(true) => {
                builder.push(" AND held_by IS NOT NULL");
            }
            Some(false) => {
                builder.push(" AND held_by IS NULL");
            }
            None => {}
        }
        builder
            .push(" ORDER BY name, tool_id LIMIT ")
            .push_bind(filter.limit as i64);

        let rows = builder.build().fetch_all(&*self.pool).await?;
        rows_into(&rows)
    }

    async fn category_breakdown(&self) -> Result<Vec<CategoryCountModel>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT category, COUNT(*) AS total, COUNT(held_by) AS checked_out
            FROM tool
            WHERE category IS NOT NULL AND category <> ''
            GROUP BY category
            ORDER BY total DESC, category
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(CategoryCountModel {
                category: row.try_get("category")?,
                total: row.try_get("total")?,
                checked_out: row.try_get("checked_out")?,
            });
        }
        Ok(out)
    }

    async fn status_breakdown(&self) -> Result<Vec<StatusCountModel>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT status, COUNT(*) AS count
            FROM tool
            GROUP BY status
            ORDER BY status NULLS LAST
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(StatusCountModel {
                status: row.try_get("status")?,
                count: row.try_get("count")?,
            });
        }
        Ok(out)
    }
}
