//! Bounded fan-out of independent read-model queries.
//!
//! The coordinator is started once, shared by `Arc`, and admits tasks through
//! a semaphore sized to the configured worker count. Results always come back
//! in submission order.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;
use tokio::sync::Semaphore;
use tool_custody_api::{CoordinatorConfig, CustodyError, CustodyResult};
use tool_custody_db::repository::RepositoryError;
use tracing::{debug, info, warn};

/// A deferred read. The closure owns whatever storage handle it needs.
pub type ReadTask<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, RepositoryError>> + Send>;

pub fn read_task<T, F, Fut>(f: F) -> ReadTask<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, RepositoryError>> + Send + 'static,
{
    Box::new(move || f().boxed())
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskFailure {
    #[error("{0}")]
    Query(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("task panicked")]
    Panicked,

    #[error("task was cancelled")]
    Cancelled,

    #[error("worker pool is shut down")]
    PoolClosed,
}

fn aggregation_error(task: usize, failure: TaskFailure) -> CustodyError {
    warn!(task, reason = %failure, "aggregate query failed");
    CustodyError::Aggregation {
        task,
        reason: failure.to_string(),
    }
}

pub struct QueryCoordinator {
    permits: Arc<Semaphore>,
    max_workers: usize,
    enabled: bool,
    task_timeout: Option<Duration>,
    shut_down: AtomicBool,
}

impl QueryCoordinator {
    pub fn start(config: &CoordinatorConfig) -> Arc<Self> {
        let max_workers = config.max_workers.max(1);
        info!(
            max_workers,
            enabled = config.enabled,
            "query coordinator started"
        );
        Arc::new(Self {
            permits: Arc::new(Semaphore::new(max_workers)),
            max_workers,
            enabled: config.enabled,
            task_timeout: config.task_timeout,
            shut_down: AtomicBool::new(false),
        })
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Runs `tasks` concurrently when possible, sequentially otherwise.
    ///
    /// The sequential path is taken when concurrency is disabled, after
    /// shutdown, and when every permit is already taken.
    pub async fn run<T: Send + 'static>(&self, tasks: Vec<ReadTask<T>>) -> CustodyResult<Vec<T>> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }
        if !self.enabled || self.is_shut_down() {
            return self.run_sequentially(tasks).await;
        }
        if self.permits.available_permits() == 0 {
            warn!(tasks = tasks.len(), "worker pool saturated, running sequentially");
            return self.run_sequentially(tasks).await;
        }
        self.run_concurrently(tasks).await
    }

    /// Spawns every task, then waits for all of them. The first failure in
    /// submission order is reported only once every task has finished.
    pub async fn run_concurrently<T: Send + 'static>(
        &self,
        tasks: Vec<ReadTask<T>>,
    ) -> CustodyResult<Vec<T>> {
        let timeout = self.task_timeout;
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let permits = self.permits.clone();
                tokio::spawn(async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|_| TaskFailure::PoolClosed)?;
                    execute(task, timeout).await
                })
            })
            .collect();

        debug!(tasks = handles.len(), "aggregate queries dispatched");

        let mut results = Vec::with_capacity(handles.len());
        let mut first_failure = None;
        for (index, handle) in handles.into_iter().enumerate() {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_err) if join_err.is_panic() => Err(TaskFailure::Panicked),
                Err(_) => Err(TaskFailure::Cancelled),
            };
            match outcome {
                Ok(value) => results.push(value),
                Err(failure) => {
                    if first_failure.is_none() {
                        first_failure = Some((index, failure));
                    }
                }
            }
        }

        match first_failure {
            Some((index, failure)) => Err(aggregation_error(index, failure)),
            None => Ok(results),
        }
    }

    pub async fn run_sequentially<T>(&self, tasks: Vec<ReadTask<T>>) -> CustodyResult<Vec<T>> {
        let mut results = Vec::with_capacity(tasks.len());
        for (index, task) in tasks.into_iter().enumerate() {
            let value = execute(task, self.task_timeout)
                .await
                .map_err(|failure| aggregation_error(index, failure))?;
            results.push(value);
        }
        Ok(results)
    }

    /// Stops admitting concurrent work. Tasks waiting for a permit fail with
    /// [`TaskFailure::PoolClosed`]; later calls to [`run`](Self::run) execute
    /// sequentially.
    pub fn shutdown(&self) {
        if !self.shut_down.swap(true, Ordering::SeqCst) {
            self.permits.close();
            info!("query coordinator shut down");
        }
    }
}

async fn execute<T>(task: ReadTask<T>, timeout: Option<Duration>) -> Result<T, TaskFailure> {
    let query = task();
    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, query)
            .await
            .map_err(|_| TaskFailure::TimedOut(limit))?,
        None => query.await,
    };
    outcome.map_err(|e| TaskFailure::Query(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::coordinator;
    use std::sync::atomic::AtomicUsize;

    fn counting_tasks(n: usize, counter: &Arc<AtomicUsize>) -> Vec<ReadTask<usize>> {
        (0..n)
            .map(|i| {
                let counter = counter.clone();
                read_task(move || async move {
                    // later submissions finish first
                    tokio::time::sleep(Duration::from_millis(((n - i) * 2) as u64)).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(i * i)
                })
            })
            .collect()
    }

    #[tokio::test]
    async fn concurrent_matches_sequential_for_any_size() {
        let pool = coordinator(3);
        for n in [0usize, 1, 2, 7, 16] {
            let counter = Arc::new(AtomicUsize::new(0));
            let concurrent = pool.run_concurrently(counting_tasks(n, &counter)).await.unwrap();
            let sequential = pool.run_sequentially(counting_tasks(n, &counter)).await.unwrap();
            assert_eq!(concurrent, sequential);
            assert_eq!(concurrent, (0..n).map(|i| i * i).collect::<Vec<_>>());
            assert_eq!(counter.load(Ordering::SeqCst), 2 * n);
        }
    }

    #[tokio::test]
    async fn in_flight_never_exceeds_worker_count() {
        let pool = coordinator(2);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let tasks: Vec<ReadTask<()>> = (0..8)
            .map(|_| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                read_task(move || async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                })
            })
            .collect();

        pool.run_concurrently(tasks).await.unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn failure_is_reported_after_every_task_ran() {
        let pool = coordinator(4);
        let counter = Arc::new(AtomicUsize::new(0));
        let mut tasks = counting_tasks(5, &counter);
        tasks.insert(
            1,
            read_task(|| async {
                Err::<usize, RepositoryError>("relation does not exist".into())
            }),
        );

        let err = pool.run_concurrently(tasks).await.unwrap_err();
        match err {
            CustodyError::Aggregation { task, reason } => {
                assert_eq!(task, 1);
                assert_eq!(reason, "relation does not exist");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    fn explode() -> Result<u8, RepositoryError> {
        panic!("boom")
    }

    #[tokio::test]
    async fn panicking_task_becomes_a_failure() {
        let pool = coordinator(2);
        let tasks: Vec<ReadTask<u8>> = vec![
            read_task(|| async { Ok(1) }),
            read_task(|| async { explode() }),
        ];
        let err = pool.run_concurrently(tasks).await.unwrap_err();
        assert!(matches!(err, CustodyError::Aggregation { task: 1, .. }));
    }

    #[tokio::test]
    async fn overrunning_task_times_out() {
        let pool = QueryCoordinator::start(&CoordinatorConfig {
            enabled: true,
            max_workers: 2,
            task_timeout: Some(Duration::from_millis(10)),
        });
        let tasks: Vec<ReadTask<u8>> = vec![
            read_task(|| async { Ok(1) }),
            read_task(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(2)
            }),
        ];
        let err = pool.run(tasks).await.unwrap_err();
        match err {
            CustodyError::Aggregation { task, reason } => {
                assert_eq!(task, 1);
                assert!(reason.starts_with("timed out"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn disabled_and_shut_down_pools_still_answer() {
        let disabled = QueryCoordinator::start(&CoordinatorConfig {
            enabled: false,
            max_workers: 4,
            task_timeout: None,
        });
        let counter = Arc::new(AtomicUsize::new(0));
        assert_eq!(disabled.run(counting_tasks(3, &counter)).await.unwrap(), vec![0, 1, 4]);

        let pool = coordinator(4);
        pool.shutdown();
        pool.shutdown();
        assert!(pool.is_shut_down());
        assert_eq!(pool.run(counting_tasks(3, &counter)).await.unwrap(), vec![0, 1, 4]);

        let err = pool.run_concurrently(counting_tasks(1, &counter)).await.unwrap_err();
        assert!(err.to_string().contains("worker pool is shut down"));
    }

    #[test]
    fn zero_workers_is_raised_to_one() {
        let pool = coordinator(0);
        assert_eq!(pool.max_workers(), 1);
    }

    #[test]
    fn sequential_run_without_a_runtime_builder() {
        let pool = coordinator(1);
        let tasks: Vec<ReadTask<&str>> =
            vec![read_task(|| async { Ok("a") }), read_task(|| async { Ok("b") })];
        let results = tokio_test::block_on(pool.run_sequentially(tasks)).unwrap();
        assert_eq!(results, vec!["a", "b"]);
    }
}
