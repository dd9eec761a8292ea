//! Local cache for API responses
//!
//! Provides a bounded in-memory TTL store plus a scoped facade with
//! per-entity TTL policy and targeted invalidation. Designed to avoid
//! redundant backend round-trips without ever blocking a caller: a cache
//! miss or failure always degrades to a fresh fetch.

pub mod facade;
pub mod key;
pub mod store;

use std::time::Duration;

/// Cache TTL configuration per data type
///
/// Shorter TTLs for data that changes frequently under user action,
/// longer for near-static reference data.
pub struct CacheTtl;

#[allow(dead_code)]
impl CacheTtl {
    // Near-static reference data
    pub const ORG_METADATA: Duration = Duration::from_secs(10 * 60); // 10 min

    // Membership changes when requests/invitations are approved
    pub const MEMBERSHIP: Duration = Duration::from_secs(5 * 60); // 5 min

    // Lists that change under normal user action
    pub const PROJECT_LIST: Duration = Duration::from_secs(3 * 60); // 3 min
    pub const TASK_LIST: Duration = Duration::from_secs(2 * 60); // 2 min
}

/// Default TTL for entries stored without an explicit policy
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Interval between background sweeps of expired entries
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Bound on the number of cached entries
pub const MAX_ENTRIES: usize = 512;

// Re-export main types
pub use facade::ScopedCache;
