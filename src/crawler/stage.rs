//! Bounded-concurrency stage execution
//!
//! A stage maps a worker function over a batch of work items with at most a
//! fixed number of workers in flight. Item failures are dropped, never
//! retried here (retry lives inside the fetcher), and never abort the stage.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Runs workers over a batch of items under a concurrency bound
///
/// The bound comes from a semaphore which is either owned by this runner or
/// shared with other runners. Sharing is how the chapter stage keeps one
/// process-wide in-flight limit even though every novel spawns its own
/// nested stage.
pub struct StageRunner {
    name: &'static str,
    semaphore: Arc<Semaphore>,
}

impl StageRunner {
    /// Creates a stage with its own concurrency bound
    ///
    /// # Arguments
    ///
    /// * `name` - Stage name used in log messages
    /// * `limit` - Maximum number of workers in flight
    pub fn new(name: &'static str, limit: usize) -> Self {
        Self {
            name,
            semaphore: Arc::new(Semaphore::new(limit)),
        }
    }

    /// Creates a stage gated by an externally owned semaphore
    pub fn shared(name: &'static str, semaphore: Arc<Semaphore>) -> Self {
        Self { name, semaphore }
    }

    /// Maps `worker` over `items`, collecting the non-failed results
    ///
    /// One task is spawned per item; each acquires a semaphore permit before
    /// its worker runs, so at most `limit` workers execute concurrently.
    /// Results are gathered in completion order, not input order. A worker
    /// returning `None` drops its item; a panicked worker is logged and
    /// dropped. Items are not started once `cancel` has fired.
    pub async fn run<I, T, F, Fut>(
        &self,
        items: Vec<I>,
        cancel: &CancellationToken,
        worker: F,
    ) -> Vec<T>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Option<T>> + Send + 'static,
    {
        let total = items.len();
        let mut tasks = JoinSet::new();

        for item in items {
            let semaphore = Arc::clone(&self.semaphore);
            let cancel = cancel.clone();
            let worker = worker.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                if cancel.is_cancelled() {
                    return None;
                }
                worker(item).await
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(value)) => results.push(value),
                Ok(None) => {}
                Err(e) => tracing::warn!("{} stage worker failed: {}", self.name, e),
            }
        }

        tracing::debug!(
            "{} stage finished: {}/{} items produced results",
            self.name,
            results.len(),
            total
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_runs_all_items() {
        let stage = StageRunner::new("test", 4);
        let cancel = CancellationToken::new();

        let mut results = stage
            .run(vec![1, 2, 3, 4, 5], &cancel, |n| async move { Some(n * 2) })
            .await;

        results.sort_unstable();
        assert_eq!(results, vec![2, 4, 6, 8, 10]);
    }

    #[tokio::test]
    async fn test_failed_items_are_dropped() {
        let stage = StageRunner::new("test", 4);
        let cancel = CancellationToken::new();

        let mut results = stage
            .run(vec![1, 2, 3, 4, 5, 6], &cancel, |n| async move {
                if n % 2 == 0 {
                    Some(n)
                } else {
                    None
                }
            })
            .await;

        results.sort_unstable();
        assert_eq!(results, vec![2, 4, 6]);
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_output() {
        let stage = StageRunner::new("test", 4);
        let cancel = CancellationToken::new();

        let results: Vec<i32> = stage.run(vec![], &cancel, |n: i32| async move { Some(n) }).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        let stage = StageRunner::new("test", 3);
        let cancel = CancellationToken::new();

        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let items: Vec<u32> = (0..10).collect();
        let (in_flight_ref, max_seen_ref) = (Arc::clone(&in_flight), Arc::clone(&max_seen));

        let results = stage
            .run(items, &cancel, move |n| {
                let in_flight = Arc::clone(&in_flight_ref);
                let max_seen = Arc::clone(&max_seen_ref);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Some(n)
                }
            })
            .await;

        assert_eq!(results.len(), 10);
        assert!(max_seen.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_shared_semaphore_bounds_across_runners() {
        let slots = Arc::new(Semaphore::new(2));
        let first = StageRunner::shared("first", Arc::clone(&slots));
        let second = StageRunner::shared("second", Arc::clone(&slots));
        let cancel = CancellationToken::new();

        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let worker = {
            let in_flight = Arc::clone(&in_flight);
            let max_seen = Arc::clone(&max_seen);
            move |n: u32| {
                let in_flight = Arc::clone(&in_flight);
                let max_seen = Arc::clone(&max_seen);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Some(n)
                }
            }
        };

        let items: Vec<u32> = (0..6).collect();
        let (a, b) = tokio::join!(
            first.run(items.clone(), &cancel, worker.clone()),
            second.run(items, &cancel, worker),
        );

        assert_eq!(a.len() + b.len(), 12);
        // The two runners together never exceed the shared limit
        assert!(max_seen.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_cancelled_stage_starts_no_items() {
        let stage = StageRunner::new("test", 2);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let started = Arc::new(AtomicUsize::new(0));
        let started_ref = Arc::clone(&started);

        let results = stage
            .run(vec![1, 2, 3], &cancel, move |n| {
                let started = Arc::clone(&started_ref);
                async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    Some(n)
                }
            })
            .await;

        assert!(results.is_empty());
        assert_eq!(started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_worker_panic_does_not_abort_stage() {
        let stage = StageRunner::new("test", 2);
        let cancel = CancellationToken::new();

        let mut results = stage
            .run(vec![1, 2, 3, 4], &cancel, |n| async move {
                if n == 2 {
                    panic!("worker blew up");
                }
                Some(n)
            })
            .await;

        results.sort_unstable();
        assert_eq!(results, vec![1, 3, 4]);
    }
}
