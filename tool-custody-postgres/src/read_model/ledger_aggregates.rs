use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder, Row};
use tool_custody_db::models::{CheckoutAction, CheckoutEventModel, DailyCountModel};
use tool_custody_db::repository::{
    EventFilter, LedgerAggregates, Page, PageRequest, RepositoryError,
};

use super::PostgresReadModel;
use crate::utils::{contains_pattern, rows_into};

#[async_trait]
impl LedgerAggregates for PostgresReadModel {
    async fn recent_events(
        &self,
        limit: usize,
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM checkout_event ORDER BY event_time DESC LIMIT $1")
            .bind(limit as i64)
            .fetch_all(&*self.pool)
            .await?;
        rows_into(&rows)
    }

    async fn checkout_trend_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCountModel>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT (event_time AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS count
            FROM checkout_event
            WHERE action = $1 AND event_time >= $2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(CheckoutAction::Checkout)
        .bind(since)
        .fetch_all(&*self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(DailyCountModel {
                day: row.try_get("day")?,
                count: row.try_get("count")?,
            });
        }
        Ok(out)
    }

    async fn find_events(
        &self,
        filter: &EventFilter,
    ) -> Result<Vec<CheckoutEventModel>, RepositoryError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM checkout_event WHERE TRUE");
        if let Some(from) = filter.from {
            builder.push(" AND event_time >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            builder.push(" AND event_time <= ").push_bind(to);
        }
        if let Some(username) = &filter.username {
            builder
                .push(" AND actor ILIKE ")
                .push_bind(contains_pattern(username))
                .push(" ESCAPE '\\'");
        }
        if let Some(tool_id) = &filter.tool_id {
            builder
                .push(" AND tool_id ILIKE ")
                .push_bind(contains_pattern(tool_id))
                .push(" ESCAPE '\\'");
        }
        if let Some(action) = filter.action {
            builder.push(" AND action = ").push_bind(action);
        }
        builder
            .push(" ORDER BY event_time DESC LIMIT ")
            .push_bind(filter.limit as i64);

        let rows = builder.build().fetch_all(&*self.pool).await?;
        rows_into(&rows)
    }

    async fn load_tool_history(
        &self,
        tool_id: &str,
        page: PageRequest,
    ) -> Result<Page<CheckoutEventModel>, RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM checkout_event WHERE tool_id = $1",
        )
        .bind(tool_id)
        .fetch_one(&*self.pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM checkout_event
            WHERE tool_id = $1
            ORDER BY event_time DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(tool_id)
        .bind(i64::try_from(page.limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset).unwrap_or(i64::MAX))
        .fetch_all(&*self.pool)
        .await?;

        Ok(Page::new(rows_into(&rows)?, total as usize, page))
    }
}
