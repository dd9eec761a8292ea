//! Push-subscription primitive
//!
//! An in-process hub the realtime transport feeds change events into.
//! Consumers subscribe with a table list and an optional user filter;
//! dropping the subscription unsubscribes. Push is an optimization only:
//! the unread watcher's fallback poll covers missed events.

use tokio::sync::broadcast;

/// Channel capacity; a lagged subscriber skips to the newest events,
/// which is fine because consumers recompute from scratch anyway.
const CHANNEL_CAPACITY: usize = 64;

/// Table names that emit change events
pub mod tables {
    pub const NOTIFICATIONS: &str = "notifications";
    pub const ORG_JOIN_REQUESTS: &str = "org_join_requests";
    pub const PROJECT_JOIN_REQUESTS: &str = "project_join_requests";
    pub const INVITATIONS: &str = "invitations";
}

/// A change event on one of the backing collections
#[derive(Debug, Clone)]
pub struct PushEvent {
    /// Which table changed
    pub table: String,

    /// The user the change concerns, when the transport knows it
    pub user_id: Option<String>,
}

/// In-process broadcast hub for change events
#[derive(Clone)]
pub struct PushHub {
    tx: broadcast::Sender<PushEvent>,
}

impl Default for PushHub {
    fn default() -> Self {
        Self::new()
    }
}

impl PushHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish a change event to all live subscriptions.
    pub fn publish(&self, event: PushEvent) {
        // No subscribers is not an error; the event is simply dropped
        let _ = self.tx.send(event);
    }

    /// Subscribe to change events on the given tables, optionally scoped to
    /// one user. Events for other tables or users are filtered out.
    pub fn subscribe(&self, tables: Vec<String>, user_id: Option<String>) -> PushSubscription {
        PushSubscription {
            rx: self.tx.subscribe(),
            tables,
            user_id,
        }
    }
}

/// A filtered receiver of change events. Dropping it unsubscribes.
pub struct PushSubscription {
    rx: broadcast::Receiver<PushEvent>,
    tables: Vec<String>,
    user_id: Option<String>,
}

impl PushSubscription {
    /// Receive the next matching event, or `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<PushEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    if self.matches(&event) {
                        return Some(event);
                    }
                }
                // Lagged subscribers skip ahead; the next recompute covers it
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::debug!("Push subscription lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn matches(&self, event: &PushEvent) -> bool {
        if !self.tables.iter().any(|t| t == &event.table) {
            return false;
        }
        match (&self.user_id, &event.user_id) {
            (Some(want), Some(got)) => want == got,
            // Events without a user annotation reach every subscriber
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_matching_event() {
        let hub = PushHub::new();
        let mut sub = hub.subscribe(vec![tables::NOTIFICATIONS.to_string()], None);

        hub.publish(PushEvent {
            table: tables::NOTIFICATIONS.to_string(),
            user_id: None,
        });

        let event = sub.recv().await.unwrap();
        assert_eq!(event.table, tables::NOTIFICATIONS);
    }

    #[tokio::test]
    async fn test_table_filter() {
        let hub = PushHub::new();
        let mut sub = hub.subscribe(vec![tables::INVITATIONS.to_string()], None);

        hub.publish(PushEvent {
            table: tables::NOTIFICATIONS.to_string(),
            user_id: None,
        });
        hub.publish(PushEvent {
            table: tables::INVITATIONS.to_string(),
            user_id: None,
        });

        let event = sub.recv().await.unwrap();
        assert_eq!(event.table, tables::INVITATIONS);
    }

    #[tokio::test]
    async fn test_user_filter() {
        let hub = PushHub::new();
        let mut sub = hub.subscribe(
            vec![tables::NOTIFICATIONS.to_string()],
            Some("user-1".to_string()),
        );

        hub.publish(PushEvent {
            table: tables::NOTIFICATIONS.to_string(),
            user_id: Some("user-2".to_string()),
        });
        hub.publish(PushEvent {
            table: tables::NOTIFICATIONS.to_string(),
            user_id: Some("user-1".to_string()),
        });

        let event = sub.recv().await.unwrap();
        assert_eq!(event.user_id.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_hub_dropped() {
        let hub = PushHub::new();
        let mut sub = hub.subscribe(vec![tables::NOTIFICATIONS.to_string()], None);
        drop(hub);

        assert!(sub.recv().await.is_none());
    }
}
