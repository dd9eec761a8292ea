//! Unified inbox: interaction aggregation and unread counting
//!
//! The inbox merges join requests, notifications, and invitations from their
//! separate backend tables into one coherent client-side view, with
//! optimistic read/delete semantics and a push-plus-poll unread badge.

pub mod aggregator;
pub mod interaction;
pub mod unread;

pub use aggregator::InteractionAggregator;
pub use interaction::{Direction, SourceKind, UnifiedInteraction};
pub use unread::{DEFAULT_POLL_INTERVAL, UnreadWatcher, compute_unread_count};

/// Bound on concurrent per-organization fetches during fan-out
pub(crate) const MAX_CONCURRENT_FETCHES: usize = 5;
