//! Scoped cache facade over the TTL store
//!
//! Wraps [`TtlCache`] with domain key naming, per-entity TTL policy, a
//! read-through `fetch_with_cache` primitive and scope-wide invalidation.
//! Values are stored as serialized JSON, mirroring how API responses travel.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use crate::cache::key::{key_in_scope, scoped_key};
use crate::cache::store::{CacheStats, TtlCache};
use crate::cache::{CacheTtl, DEFAULT_TTL, MAX_ENTRIES};
use crate::error::Result;

/// Explicitly constructed, shareable cache facade.
///
/// Intentionally not a module-level singleton: callers (and tests) construct
/// their own instance and inject it where needed. Cloning shares the
/// underlying store.
#[derive(Clone)]
pub struct ScopedCache {
    inner: Arc<Mutex<TtlCache<Vec<u8>>>>,
    /// When false every read is a miss and nothing is stored (--no-cache)
    enabled: bool,
}

impl Default for ScopedCache {
    fn default() -> Self {
        Self::new(MAX_ENTRIES)
    }
}

impl ScopedCache {
    /// Create a facade over a fresh store bounded to `max_entries`.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TtlCache::new(max_entries, DEFAULT_TTL))),
            enabled: true,
        }
    }

    /// Enable or disable caching. A disabled facade passes every fetch
    /// straight through to the producer.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Read-through fetch: return the cached value on a hit, otherwise await
    /// `producer`, store its result and return it.
    ///
    /// Producer errors propagate uncached — a failed fetch must not be
    /// cached as a false "empty" result. Cache-side problems (lock poisoning,
    /// decode failure of a stale payload) degrade to a miss, never an error.
    pub async fn fetch_with_cache<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !self.enabled {
            return producer().await;
        }

        if let Some(value) = self.get_decoded(key) {
            log::debug!("Cache hit: {}", key);
            return Ok(value);
        }

        let value = producer().await?;
        self.set_encoded(key, &value, ttl);
        Ok(value)
    }

    /// Cached organization metadata lookup.
    pub async fn org_metadata<T, F, Fut>(&self, org_id: &str, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = scoped_key("org_meta", org_id, None);
        self.fetch_with_cache(&key, CacheTtl::ORG_METADATA, producer)
            .await
    }

    /// Cached project list for an organization, as visible to one user.
    pub async fn org_projects<T, F, Fut>(
        &self,
        org_id: &str,
        user_id: &str,
        producer: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = scoped_key("org_projects", org_id, Some(user_id));
        self.fetch_with_cache(&key, CacheTtl::PROJECT_LIST, producer)
            .await
    }

    /// Cached task list for a project.
    pub async fn project_tasks<T, F, Fut>(&self, project_id: &str, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = scoped_key("project_tasks", project_id, None);
        self.fetch_with_cache(&key, CacheTtl::TASK_LIST, producer)
            .await
    }

    /// Cached organization membership for a user.
    pub async fn user_membership<T, F, Fut>(&self, user_id: &str, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = scoped_key("user_membership", user_id, None);
        self.fetch_with_cache(&key, CacheTtl::MEMBERSHIP, producer)
            .await
    }

    /// Invalidate every key derived from an organization (and, when given,
    /// that user's subject-keyed entries).
    ///
    /// Called after any mutation on the scope so the next read is guaranteed
    /// fresh rather than waiting out the TTL. A missed invalidation is not
    /// fatal: TTL expiry is the safety net.
    pub fn clear_scope(&self, org_id: &str, user_id: Option<&str>) -> usize {
        match self.inner.lock() {
            Ok(mut guard) => guard.remove_matching(|key| key_in_scope(key, org_id, user_id)),
            Err(_) => 0,
        }
    }

    /// Delete a single entry.
    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().map(|mut g| g.delete(key)).unwrap_or(false)
    }

    /// Drop all entries. Returns the number removed.
    pub fn clear_all(&self) -> usize {
        self.inner.lock().map(|mut g| g.clear()).unwrap_or(0)
    }

    /// Remove expired entries now. Returns the number removed.
    pub fn sweep(&self) -> usize {
        self.inner.lock().map(|mut g| g.sweep()).unwrap_or(0)
    }

    /// Get statistics about the underlying store.
    pub fn stats(&self) -> Option<CacheStats> {
        self.inner.lock().ok().map(|g| g.stats())
    }

    /// Start a background task that sweeps expired entries on `interval`.
    ///
    /// The task is aborted when the returned guard is dropped, giving the
    /// cache an explicit teardown path.
    pub fn spawn_sweeper(&self, interval: Duration) -> SweeperGuard {
        let cache = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The immediate first tick would sweep an empty cache
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = cache.sweep();
                if removed > 0 {
                    log::debug!("Cache sweep removed {} expired entries", removed);
                }
            }
        });
        SweeperGuard { handle }
    }

    fn get_decoded<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut guard = self.inner.lock().ok()?;
        guard
            .get(key)
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    fn set_encoded<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if let Ok(mut guard) = self.inner.lock()
            && let Ok(bytes) = serde_json::to_vec(value)
        {
            guard.set(key, bytes, Some(ttl));
        }
    }
}

/// Guard owning the background sweeper task. Aborts the task on drop.
pub struct SweeperGuard {
    handle: JoinHandle<()>,
}

impl Drop for SweeperGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_miss_then_hit_invokes_producer_once() {
        let cache = ScopedCache::new(16);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: Vec<String> = cache
                .fetch_with_cache("projects:org-1", Duration::from_secs(60), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["alpha".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, vec!["alpha".to_string()]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_calls_producer() {
        let cache = ScopedCache::new(16).with_enabled(false);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let _: Vec<String> = cache
                .fetch_with_cache("projects:org-1", Duration::from_secs(60), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["alpha".to_string()])
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_producer_error_not_cached() {
        let cache = ScopedCache::new(16);
        let calls = AtomicUsize::new(0);

        let first: Result<Vec<String>> = cache
            .fetch_with_cache("projects:org-1", Duration::from_secs(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(crate::error::ApiError::ServerError("boom".to_string()).into())
            })
            .await;
        assert!(first.is_err());

        // A failed fetch must not poison the key: the next call re-fetches
        let second: Vec<String> = cache
            .fetch_with_cache("projects:org-1", Duration::from_secs(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec!["alpha".to_string()])
            })
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_scope_targets_only_matching_keys() {
        let cache = ScopedCache::new(16);
        let ttl = Duration::from_secs(60);

        for (org, user) in [("org-1", "user-1"), ("org-2", "user-1")] {
            let key = scoped_key("org_projects", org, Some(user));
            let _: Vec<String> = cache
                .fetch_with_cache(&key, ttl, || async { Ok(vec![org.to_string()]) })
                .await
                .unwrap();
        }
        let membership_key = scoped_key("user_membership", "user-1", None);
        let _: Vec<String> = cache
            .fetch_with_cache(&membership_key, ttl, || async { Ok(vec![]) })
            .await
            .unwrap();

        let removed = cache.clear_scope("org-1", Some("user-1"));
        assert_eq!(removed, 2);

        // org-2 entry must survive: its producer is not re-invoked
        let calls = AtomicUsize::new(0);
        let key = scoped_key("org_projects", "org-2", Some("user-1"));
        let _: Vec<String> = cache
            .fetch_with_cache(&key, ttl, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![])
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_domain_helpers_use_distinct_keys() {
        let cache = ScopedCache::new(16);

        let projects: Vec<String> = cache
            .org_projects("org-1", "user-1", || async { Ok(vec!["p1".to_string()]) })
            .await
            .unwrap();
        let tasks: Vec<String> = cache
            .project_tasks("project-9", || async { Ok(vec!["t1".to_string()]) })
            .await
            .unwrap();

        assert_eq!(projects, vec!["p1".to_string()]);
        assert_eq!(tasks, vec!["t1".to_string()]);
        assert_eq!(cache.stats().unwrap().valid_entries, 2);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let cache = ScopedCache::new(16);
        let _: Vec<String> = cache
            .org_metadata("org-1", || async { Ok(vec![]) })
            .await
            .unwrap();
        assert_eq!(cache.clear_all(), 1);
        assert_eq!(cache.stats().unwrap().total_entries, 0);
    }

    #[tokio::test]
    async fn test_sweeper_guard_aborts_on_drop() {
        let cache = ScopedCache::new(16);
        let guard = cache.spawn_sweeper(Duration::from_millis(10));
        drop(guard);
        // Nothing to assert beyond not hanging: the task is detached-aborted
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
