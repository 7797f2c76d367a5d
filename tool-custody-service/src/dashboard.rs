//! Dashboard and stats assembly.
//!
//! Every aggregate is an independent read-model query fanned out through the
//! [`QueryCoordinator`]. A failed fan-out is retried once on the sequential
//! path; the view is never rendered from partial results.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tool_custody_api::{
    CalibrationBucketCount, CategoryCount, CustodyError, CustodyResult, DashboardConfig,
    DashboardView, EventSummary, OverdueReturn, StatsView, UsageDay,
};
use tool_custody_db::models::{CategoryCountModel, CheckoutEventModel, DailyCountModel, ToolModel};
use tool_custody_db::repository::{CustodyReadModel, RepositoryError};
use tracing::warn;

use crate::calibration::{self, CalibrationBucket};
use crate::coordinator::{read_task, QueryCoordinator, ReadTask};
use crate::overdue::compute_overdue_returns;

enum Fragment {
    ToolCount(i64),
    CheckedOutCount(i64),
    CalibratedTools(Vec<ToolModel>),
    RecentEvents(Vec<CheckoutEventModel>),
    Categories(Vec<CategoryCountModel>),
    Trend(Vec<DailyCountModel>),
    OverdueReturns(Vec<OverdueReturn>),
}

#[derive(Default)]
struct Fragments {
    total: i64,
    checked_out: i64,
    calibrated: Vec<ToolModel>,
    recent: Vec<CheckoutEventModel>,
    categories: Vec<CategoryCountModel>,
    trend: Vec<DailyCountModel>,
    overdue: Vec<OverdueReturn>,
}

impl FromIterator<Fragment> for Fragments {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        let mut out = Fragments::default();
        for fragment in iter {
            match fragment {
                Fragment::ToolCount(n) => out.total = n,
                Fragment::CheckedOutCount(n) => out.checked_out = n,
                Fragment::CalibratedTools(tools) => out.calibrated = tools,
                Fragment::RecentEvents(events) => out.recent = events,
                Fragment::Categories(rows) => out.categories = rows,
                Fragment::Trend(days) => out.trend = days,
                Fragment::OverdueReturns(rows) => out.overdue = rows,
            }
        }
        out
    }
}

pub struct DashboardService<R: CustodyReadModel> {
    reader: Arc<R>,
    coordinator: Arc<QueryCoordinator>,
    config: DashboardConfig,
}

impl<R: CustodyReadModel> DashboardService<R> {
    pub fn new(
        reader: Arc<R>,
        coordinator: Arc<QueryCoordinator>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            reader,
            coordinator,
            config,
        }
    }

    pub async fn dashboard(&self) -> CustodyResult<DashboardView> {
        self.dashboard_at(Utc::now()).await
    }

    pub async fn dashboard_at(&self, now: DateTime<Utc>) -> CustodyResult<DashboardView> {
        let parts = self.gather(|| self.dashboard_tasks(now)).await?;
        let today = now.date_naive();

        let calibration_overdue = parts
            .calibrated
            .iter()
            .filter(|t| calibration::is_overdue(t.calibration_due_str(), today))
            .count();

        let mut bucket_counts = [0usize; 4];
        for tool in &parts.calibrated {
            if let Some(bucket) = calibration::bucket(tool.calibration_due_str(), today) {
                bucket_counts[bucket as usize] += 1;
            }
        }
        let calibration_summary = CalibrationBucket::ALL
            .iter()
            .map(|bucket| CalibrationBucketCount {
                label: bucket.label().to_string(),
                count: bucket_counts[*bucket as usize],
                color: bucket.color().to_string(),
            })
            .collect();

        let category_breakdown: Vec<CategoryCount> = parts
            .categories
            .iter()
            .map(|row| CategoryCount {
                name: row.category.clone(),
                count: row.total,
            })
            .collect();
        let categories = category_breakdown.iter().map(|c| c.name.clone()).collect();

        let usage_trend: Vec<UsageDay> = parts.trend.iter().map(UsageDay::from).collect();
        let max_usage = usage_trend.iter().map(|d| d.count).max().unwrap_or(1).max(1);

        Ok(DashboardView {
            total_tools: parts.total,
            checked_out: parts.checked_out,
            in_stock: parts.total - parts.checked_out,
            calibration_overdue,
            recent_events: parts.recent.iter().map(EventSummary::from).collect(),
            category_breakdown,
            categories,
            usage_trend,
            max_usage,
            calibration_summary,
            overdue_returns: parts.overdue,
        })
    }

    pub async fn stats(&self) -> CustodyResult<StatsView> {
        let today = Utc::now().date_naive();
        let parts = self.gather(|| self.counts()).await?;
        Ok(StatsView {
            total_tools: parts.total,
            checked_out: parts.checked_out,
            in_stock: parts.total - parts.checked_out,
            calibrated_tools: parts.calibrated.len(),
            calibration_overdue: parts
                .calibrated
                .iter()
                .filter(|t| calibration::is_overdue(t.calibration_due_str(), today))
                .count(),
        })
    }

    async fn gather(
        &self,
        build: impl Fn() -> Vec<ReadTask<Fragment>>,
    ) -> CustodyResult<Fragments> {
        match self.coordinator.run(build()).await {
            Ok(fragments) => Ok(fragments.into_iter().collect()),
            Err(CustodyError::Aggregation { task, reason }) => {
                warn!(task, %reason, "dashboard aggregation failed, retrying sequentially");
                let fragments = self.coordinator.run_sequentially(build()).await?;
                Ok(fragments.into_iter().collect())
            }
            Err(other) => Err(other),
        }
    }

    fn counts(&self) -> Vec<ReadTask<Fragment>> {
        let total = self.reader.clone();
        let checked_out = self.reader.clone();
        let calibrated = self.reader.clone();
        vec![
            read_task(move || async move { total.count_tools().await.map(Fragment::ToolCount) }),
            read_task(move || async move {
                checked_out
                    .count_checked_out()
                    .await
                    .map(Fragment::CheckedOutCount)
            }),
            read_task(move || async move {
                calibrated
                    .list_calibrated_tools()
                    .await
                    .map(Fragment::CalibratedTools)
            }),
        ]
    }

    fn dashboard_tasks(&self, now: DateTime<Utc>) -> Vec<ReadTask<Fragment>> {
        let recent = self.reader.clone();
        let categories = self.reader.clone();
        let trend = self.reader.clone();
        let overdue = self.reader.clone();
        let recent_limit = self.config.recent_events_limit;
        let since = trend_cutoff(now, self.config.usage_trend_days);

        let mut tasks = self.counts();
        tasks.push(read_task(move || async move {
            recent
                .recent_events(recent_limit)
                .await
                .map(Fragment::RecentEvents)
        }));
        tasks.push(read_task(move || async move {
            categories
                .category_breakdown()
                .await
                .map(Fragment::Categories)
        }));
        tasks.push(read_task(move || async move {
            trend.checkout_trend_since(since).await.map(Fragment::Trend)
        }));
        tasks.push(read_task(move || overdue_returns(overdue, now)));
        tasks
    }
}

/// Start of the usage trend window. A window longer than the calendar reaches
/// back to the earliest instant; a negative one starts now.
fn trend_cutoff(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days.max(0))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

async fn overdue_returns<R: CustodyReadModel>(
    reader: Arc<R>,
    now: DateTime<Utc>,
) -> Result<Fragment, RepositoryError> {
    let tools = reader.list_checked_out_tools().await?;
    let rows = compute_overdue_returns(reader.as_ref(), &tools, now).await?;
    Ok(Fragment::OverdueReturns(rows))
}
