//! Unread badge computation
//!
//! The unread count is the sum of four independently-queried sources. Each
//! source is isolated: one failing query degrades its term to zero instead of
//! aborting the sum. The watcher recomputes on realtime push events and on a
//! fixed fallback poll; push is an optimization, the poll is the correctness
//! backstop.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::push::{PushHub, tables};
use crate::client::{CollabApi, fan_out_flatten};

use super::MAX_CONCURRENT_FETCHES;

/// Fallback poll interval covering missed push events
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Total unread count for a user.
///
/// Sums four sources: unread non-invitation notifications, pending join
/// requests against organizations the user administers, pending project join
/// requests the user manages, and pending invitations addressed to the user.
/// Invitation-kind notifications are excluded because the invitation term
/// already counts them.
pub async fn compute_unread_count(api: &Arc<dyn CollabApi>, user_id: &str, email: &str) -> usize {
    let notifications = match api.list_notifications(user_id).await {
        Ok(items) => items
            .iter()
            .filter(|n| !n.is_read && !n.kind.is_invitation())
            .count(),
        Err(err) => {
            warn!("Unread notifications query failed, counting 0: {}", err);
            0
        }
    };

    let org_requests = match api.list_orgs_administered(user_id).await {
        Ok(orgs) => {
            let org_ids: Vec<String> = orgs.into_iter().map(|o| o.id).collect();
            let api = api.clone();
            fan_out_flatten(
                org_ids,
                move |org_id: String| {
                    let api = api.clone();
                    async move { api.list_org_join_requests(&org_id).await }
                },
                MAX_CONCURRENT_FETCHES,
            )
            .await
            .iter()
            .filter(|r| !r.status.is_resolved())
            .count()
        }
        Err(err) => {
            warn!("Administered orgs query failed, counting 0: {}", err);
            0
        }
    };

    let project_requests = match api.list_project_join_requests_managed_by(user_id).await {
        Ok(items) => items.iter().filter(|r| !r.status.is_resolved()).count(),
        Err(err) => {
            warn!("Project requests query failed, counting 0: {}", err);
            0
        }
    };

    let now = Utc::now();
    let invitations = match api.list_invitations_received(email, Some(user_id)).await {
        Ok(items) => items.iter().filter(|i| i.is_actionable(now)).count(),
        Err(err) => {
            warn!("Invitations query failed, counting 0: {}", err);
            0
        }
    };

    debug!(
        "Unread terms: {} notifications + {} org requests + {} project requests + {} invitations",
        notifications, org_requests, project_requests, invitations
    );
    notifications + org_requests + project_requests + invitations
}

/// Background unread-count watcher.
///
/// Publishes recomputed counts on a watch channel. Recomputes when any of the
/// four backing tables changes for this user and on every poll tick. Counts
/// are recomputed from scratch each time, so a stale in-flight refresh is
/// simply overwritten by the next one. Dropping the watcher stops the task.
pub struct UnreadWatcher {
    rx: watch::Receiver<usize>,
    handle: JoinHandle<()>,
}

impl UnreadWatcher {
    pub fn spawn(
        api: Arc<dyn CollabApi>,
        hub: &PushHub,
        user_id: impl Into<String>,
        email: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        let user_id = user_id.into();
        let email = email.into();
        let (tx, rx) = watch::channel(0);
        let mut subscription = hub.subscribe(
            vec![
                tables::NOTIFICATIONS.to_string(),
                tables::ORG_JOIN_REQUESTS.to_string(),
                tables::PROJECT_JOIN_REQUESTS.to_string(),
                tables::INVITATIONS.to_string(),
            ],
            Some(user_id.clone()),
        );

        let handle = tokio::spawn(async move {
            loop {
                let count = compute_unread_count(&api, &user_id, &email).await;
                if tx.send(count).is_err() {
                    break;
                }
                tokio::select! {
                    _ = tokio::time::sleep(poll_interval) => {}
                    event = subscription.recv() => {
                        if event.is_none() {
                            // Hub gone; keep polling as the backstop
                            tokio::time::sleep(poll_interval).await;
                        }
                    }
                }
            }
        });

        Self { rx, handle }
    }

    /// Receiver for recomputed counts; `changed()` resolves on each refresh.
    pub fn counts(&self) -> watch::Receiver<usize> {
        self.rx.clone()
    }
}

impl Drop for UnreadWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
