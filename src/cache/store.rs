//! In-memory TTL cache with bounded size
//!
//! Generic key-value store with per-entry expiry. Eviction at capacity is
//! insertion-order (FIFO), not LRU: correctness rests on TTL, so tracking
//! access recency would buy nothing here.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// A single cache entry. Never exposed outside a `get`/`set` pair.
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    expires_at: Instant,
    /// Insertion sequence number, used for FIFO eviction
    seq: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Statistics about cache state
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub max_size: usize,
    pub oldest_age: Option<Duration>,
    pub newest_age: Option<Duration>,
}

/// Bounded in-memory key-value store with per-entry TTL.
///
/// None of the operations fail: the cache is an optimization layer, and
/// absence is the only signaled condition. Expired entries are reaped lazily
/// on read and in bulk by [`TtlCache::sweep`].
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion order as (seq, key) pairs. Stale pairs (key re-inserted or
    /// deleted since) are skipped during eviction.
    insertion_order: VecDeque<(u64, String)>,
    next_seq: u64,
    max_size: usize,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache holding at most `max_size` entries.
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
            next_seq: 0,
            max_size,
            default_ttl,
        }
    }

    /// Store a value with expiry `now + ttl` (default TTL when `None`).
    ///
    /// At capacity, the single oldest-inserted entry is evicted first.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let now = Instant::now();
        let ttl = ttl.unwrap_or(self.default_ttl);

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            self.evict_oldest();
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        self.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                created_at: now,
                expires_at: now + ttl,
                seq,
            },
        );
        self.insertion_order.push_back((seq, key));
    }

    /// Get a value if present and not expired.
    ///
    /// Expired entries are deleted as a side effect of the read.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Check for a live entry, with the same expiry semantics as `get`.
    #[allow(dead_code)]
    pub fn has(&mut self, key: &str) -> bool {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => true,
            Some(_) => {
                self.entries.remove(key);
                false
            }
            None => false,
        }
    }

    /// Remove a specific entry. Returns whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove all entries.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.insertion_order.clear();
        count
    }

    /// Remove every entry whose key matches the predicate. Returns the count.
    pub fn remove_matching(&mut self, mut predicate: impl FnMut(&str) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !predicate(key));
        before - self.entries.len()
    }

    /// Remove all expired entries. Returns the number removed.
    ///
    /// Invoked on a fixed interval by the background sweeper so that memory
    /// does not grow unbounded between reads.
    pub fn sweep(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        // Drop insertion-order pairs whose entry is gone or superseded
        let entries = &self.entries;
        self.insertion_order
            .retain(|(seq, key)| entries.get(key).is_some_and(|e| e.seq == *seq));
        before - self.entries.len()
    }

    /// Number of entries currently stored (including not-yet-reaped expired ones).
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let total = self.entries.len();
        let valid = self
            .entries
            .values()
            .filter(|e| !e.is_expired(now))
            .count();

        let mut oldest: Option<Instant> = None;
        let mut newest: Option<Instant> = None;
        for entry in self.entries.values().filter(|e| !e.is_expired(now)) {
            oldest = Some(oldest.map_or(entry.created_at, |o| o.min(entry.created_at)));
            newest = Some(newest.map_or(entry.created_at, |n| n.max(entry.created_at)));
        }

        CacheStats {
            total_entries: total,
            valid_entries: valid,
            expired_entries: total - valid,
            max_size: self.max_size,
            oldest_age: oldest.map(|o| now.duration_since(o)),
            newest_age: newest.map(|n| now.duration_since(n)),
        }
    }

    /// Evict the least-recently-inserted live entry.
    fn evict_oldest(&mut self) {
        while let Some((seq, key)) = self.insertion_order.pop_front() {
            // Skip stale pairs left behind by deletes and re-inserts
            if self.entries.get(&key).is_some_and(|e| e.seq == seq) {
                self.entries.remove(&key);
                return;
            }
        }
    }
}
