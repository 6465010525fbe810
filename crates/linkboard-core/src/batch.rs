//! Chunked concurrent execution with an inter-chunk pause.
//!
//! The upstream API has no published rate limit, but hammering it with one
//! request per stop gets calls throttled. [`run_batched`] bounds the blast
//! radius: at most `width` lookups in flight, and a fixed pause between
//! consecutive chunks. The pause policy is plain data so tests can swap it
//! and drive the clock with `tokio::time::pause`.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tracing::warn;

/// Concurrency width and pacing for one batched fan-out.
#[derive(Debug, Clone)]
pub struct BatchPolicy {
    /// How many items run concurrently within a chunk. Zero is treated as
    /// one rather than stalling the pipeline.
    pub width: usize,
    /// Pause between consecutive chunks. Not incurred after the last chunk.
    pub delay: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            width: 5,
            delay: Duration::from_millis(500),
        }
    }
}

/// Run `op` over `items` in consecutive chunks of `policy.width`.
///
/// Within a chunk every item runs concurrently and all results are awaited
/// before the next chunk starts; between chunks (and only between them,
/// `ceil(n / width) - 1` times in total) the task sleeps for `policy.delay`.
///
/// Output order always matches input order, regardless of per-item
/// completion order. A failed item yields `None` in its slot, logged at
/// `warn`, without disturbing its siblings.
pub async fn run_batched<T, R, E, F, Fut>(
    items: Vec<T>,
    policy: &BatchPolicy,
    op: F,
) -> Vec<Option<R>>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: Display,
{
    let width = policy.width.max(1);
    let rounds = items.len().div_ceil(width);
    let mut results = Vec::with_capacity(items.len());
    let mut remaining = items.into_iter();

    for round in 0..rounds {
        if round > 0 {
            tokio::time::sleep(policy.delay).await;
        }
        let chunk: Vec<T> = remaining.by_ref().take(width).collect();
        for outcome in join_all(chunk.into_iter().map(&op)).await {
            match outcome {
                Ok(value) => results.push(Some(value)),
                Err(e) => {
                    warn!(error = %e, "batched item failed, treating result as absent");
                    results.push(None);
                }
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(width: usize, delay_ms: u64) -> BatchPolicy {
        BatchPolicy {
            width,
            delay: Duration::from_millis(delay_ms),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn output_order_matches_input_order_under_skewed_latency() {
        // Within each chunk, later items complete first.
        let items: Vec<u64> = (0..9).collect();
        let results = run_batched(items, &policy(3, 10), |i| async move {
            tokio::time::sleep(Duration::from_millis(100_u64.saturating_sub(i * 10))).await;
            Ok::<_, &str>(i)
        })
        .await;

        let got: Vec<u64> = results.into_iter().flatten().collect();
        assert_eq!(got, (0..9).collect::<Vec<u64>>());
    }

    #[tokio::test(start_paused = true)]
    async fn incurs_exactly_ceil_minus_one_delays() {
        // 5 items at width 2 is 3 chunks, so 2 pauses of 500ms each.
        let start = tokio::time::Instant::now();
        let results = run_batched((0..5).collect::<Vec<i32>>(), &policy(2, 500), |i| async move {
            Ok::<_, &str>(i)
        })
        .await;

        assert_eq!(results.len(), 5);
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn single_chunk_incurs_no_delay() {
        let start = tokio::time::Instant::now();
        let results = run_batched((0..3).collect::<Vec<i32>>(), &policy(5, 500), |i| async move {
            Ok::<_, &str>(i)
        })
        .await;

        assert_eq!(results.len(), 3);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn chunk_members_run_concurrently() {
        // Five 100ms items at width 5 take 100ms total, not 500ms.
        let start = tokio::time::Instant::now();
        run_batched((0..5).collect::<Vec<i32>>(), &policy(5, 500), |i| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, &str>(i)
        })
        .await;

        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn one_failure_does_not_poison_the_chunk() {
        let results = run_batched((0..4).collect::<Vec<i32>>(), &policy(3, 0), |i| async move {
            if i == 2 { Err("boom") } else { Ok(i) }
        })
        .await;

        assert_eq!(results, vec![Some(0), Some(1), None, Some(3)]);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let results =
            run_batched(Vec::<i32>::new(), &policy(5, 500), |i| async move { Ok::<_, &str>(i) })
                .await;
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_width_is_treated_as_one() {
        let start = tokio::time::Instant::now();
        let results = run_batched((0..3).collect::<Vec<i32>>(), &policy(0, 100), |i| async move {
            Ok::<_, &str>(i)
        })
        .await;

        assert_eq!(results.len(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }
}
