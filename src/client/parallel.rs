//! Concurrent fan-out utilities for independent API requests.
//!
//! Each organization's request list (and similar per-key collections) is
//! independent, so fetching them sequentially compounds latency linearly.
//! These helpers issue up to `max_concurrent` requests at a time and report
//! per-key outcomes, so one failing source never aborts the others.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};

use crate::error::Result;

/// Type alias for boxed futures used in fan-out
type KeyFuture<K, T> = Pin<Box<dyn Future<Output = (K, Result<Vec<T>>)> + Send>>;

/// Fetch a collection per key with bounded concurrency.
///
/// Issues `fetch(key)` for every key, at most `max_concurrent` in flight,
/// and returns each key's result in arrival order. Failures are returned
/// alongside successes rather than short-circuiting.
pub async fn fan_out<K, T, F, Fut>(
    keys: Vec<K>,
    fetch: F,
    max_concurrent: usize,
) -> Vec<(K, Result<Vec<T>>)>
where
    K: Clone + Send + 'static,
    T: Send + 'static,
    F: Fn(K) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    if keys.is_empty() {
        return Vec::new();
    }

    debug!(
        "Fanning out {} requests with max {} concurrent",
        keys.len(),
        max_concurrent
    );

    let mut results = Vec::with_capacity(keys.len());
    let mut futures: FuturesUnordered<KeyFuture<K, T>> = FuturesUnordered::new();
    let mut pending_keys = keys.into_iter();

    // Helper to create a boxed future
    let make_future = |key: K, f: &F| -> KeyFuture<K, T> {
        let fut = f(key.clone());
        Box::pin(async move {
            let result = fut.await;
            (key, result)
        })
    };

    // Seed initial batch up to max_concurrent
    for key in pending_keys.by_ref().take(max_concurrent) {
        futures.push(make_future(key, &fetch));
    }

    // Collect results and refill to maintain concurrency
    while let Some((key, result)) = futures.next().await {
        results.push((key, result));

        if let Some(next_key) = pending_keys.next() {
            futures.push(make_future(next_key, &fetch));
        }
    }

    results
}

/// Fan out and flatten, degrading failed keys to empty.
///
/// Failures are logged and dropped; partial results from the healthy keys
/// are always returned.
pub async fn fan_out_flatten<K, T, F, Fut>(keys: Vec<K>, fetch: F, max_concurrent: usize) -> Vec<T>
where
    K: Clone + Send + std::fmt::Display + 'static,
    T: Send + 'static,
    F: Fn(K) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    let mut items = Vec::new();
    for (key, result) in fan_out(keys, fetch, max_concurrent).await {
        match result {
            Ok(batch) => {
                debug!("Fan-out key {} returned {} items", key, batch.len());
                items.extend(batch);
            }
            Err(err) => {
                warn!("Fan-out key {} failed, continuing without it: {}", key, err);
            }
        }
    }
    items
}
