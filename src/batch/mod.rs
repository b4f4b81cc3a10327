//! Bulk population from a payload directory and bulk cleanup of the catalog.
//!
//! Both run their per-resource requests on a bounded pool so a large payload
//! set never opens more than `concurrency` upstream requests at once.

pub mod cleanup;
pub mod payloads;
pub mod populate;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Run `job` over every item with at most `concurrency` in flight. Results
/// come back in input order. A panicked job is logged and dropped.
pub(crate) async fn run_bounded<I, T, F, Fut>(items: Vec<I>, concurrency: usize, job: F) -> Vec<T>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut set = JoinSet::new();
    for (idx, item) in items.into_iter().enumerate() {
        let permits = permits.clone();
        let fut = job(item);
        set.spawn(async move {
            // The semaphore is never closed, so acquire only fails if it is.
            let _permit = permits.acquire_owned().await.ok();
            (idx, fut.await)
        });
    }

    let mut out = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(pair) => out.push(pair),
            Err(e) => tracing::error!(error = %e, "batch task failed"),
        }
    }
    out.sort_by_key(|(idx, _)| *idx);
    out.into_iter().map(|(_, v)| v).collect()
}
