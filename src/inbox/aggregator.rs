//! Unified inbox aggregation
//!
//! Pulls join requests, notifications, and invitations from their separate
//! backend tables into one view. Read and delete intents are applied
//! optimistically and never reverted: the local overlay sets keyed by
//! `(SourceKind, id)` survive reloads, so a failed or slow acknowledgement
//! write cannot resurface an item the user already dismissed.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};

use crate::client::models::{Invitation, InvitationResponse, ReviewDecision};
use crate::client::{CollabApi, fan_out_flatten};
use crate::error::{Error, Result};

use super::MAX_CONCURRENT_FETCHES;
use super::interaction::{InteractionKey, InteractionSource, SourceKind, UnifiedInteraction};

/// Aggregates the user's inbox from all backing tables.
///
/// `load_all` rebuilds the merged timeline from scratch; mutations update the
/// in-memory list first and fire the backend write second. One failing source
/// degrades to empty rather than blanking the whole inbox.
pub struct InteractionAggregator {
    api: Arc<dyn CollabApi>,
    user_id: String,
    email: String,
    interactions: Vec<UnifiedInteraction>,
    invitations_received: Vec<Invitation>,
    invitations_sent: Vec<Invitation>,
    /// Read intents applied locally, kept across reloads
    locally_read: HashSet<InteractionKey>,
    /// Delete intents applied locally, kept across reloads
    locally_deleted: HashSet<InteractionKey>,
}

impl InteractionAggregator {
    pub fn new(api: Arc<dyn CollabApi>, user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            api,
            user_id: user_id.into(),
            email: email.into(),
            interactions: Vec::new(),
            invitations_received: Vec::new(),
            invitations_sent: Vec::new(),
            locally_read: HashSet::new(),
            locally_deleted: HashSet::new(),
        }
    }

    /// The merged timeline, newest first
    pub fn interactions(&self) -> &[UnifiedInteraction] {
        &self.interactions
    }

    pub fn invitations_received(&self) -> &[Invitation] {
        &self.invitations_received
    }

    pub fn invitations_sent(&self) -> &[Invitation] {
        &self.invitations_sent
    }

    /// Rebuild the full inbox from the backend.
    ///
    /// Each source is fetched independently; a failing source logs a warning
    /// and contributes nothing. Local read/delete overlays are re-applied to
    /// the fresh data, so optimistic edits survive the reload.
    pub async fn load_all(&mut self) {
        let mut merged: Vec<UnifiedInteraction> = Vec::new();

        // Join requests against organizations the user administers, one
        // fetch per org with bounded concurrency
        let orgs = unwrap_or_empty(
            "administered organizations",
            self.api.list_orgs_administered(&self.user_id).await,
        );
        let org_ids: Vec<String> = orgs.into_iter().map(|o| o.id).collect();
        let api = self.api.clone();
        let org_requests = fan_out_flatten(
            org_ids,
            move |org_id: String| {
                let api = api.clone();
                async move { api.list_org_join_requests(&org_id).await }
            },
            MAX_CONCURRENT_FETCHES,
        )
        .await;
        merged.extend(
            org_requests
                .into_iter()
                .map(|r| UnifiedInteraction::received(InteractionSource::OrgJoinRequest(r))),
        );

        // Requests the user has sent
        let sent = unwrap_or_empty(
            "sent join requests",
            self.api.list_sent_join_requests(&self.user_id).await,
        );
        merged.extend(
            sent.into_iter()
                .map(|r| UnifiedInteraction::sent(InteractionSource::OrgJoinRequest(r))),
        );

        // Project join requests for projects the user manages
        let project_requests = unwrap_or_empty(
            "project join requests",
            self.api
                .list_project_join_requests_managed_by(&self.user_id)
                .await,
        );
        merged.extend(
            project_requests
                .into_iter()
                .map(|r| UnifiedInteraction::received(InteractionSource::ProjectJoinRequest(r))),
        );

        // Notifications, minus invitation-kind ones (those duplicate records
        // surfaced by the invitation lists below)
        let notifications = unwrap_or_empty(
            "notifications",
            self.api.list_notifications(&self.user_id).await,
        );
        merged.extend(
            notifications
                .into_iter()
                .filter(|n| !n.kind.is_invitation())
                .map(|n| UnifiedInteraction::system(InteractionSource::Notification(n))),
        );

        // Invitations render as a parallel list, not part of the timeline
        let mut received = unwrap_or_empty(
            "received invitations",
            self.api
                .list_invitations_received(&self.email, Some(&self.user_id))
                .await,
        );
        let mut sent_invitations = unwrap_or_empty(
            "sent invitations",
            self.api.list_invitations_sent(&self.user_id).await,
        );
        self.enrich_inviter_names(&mut received, &mut sent_invitations)
            .await;

        // Dedup by (kind, id), drop locally-deleted items, re-apply local
        // read overlay, then stable-sort newest first. Stability preserves
        // fetch order for equal timestamps instead of fabricating an order
        // the source does not guarantee.
        let mut seen: HashSet<InteractionKey> = HashSet::new();
        let locally_read = &self.locally_read;
        let locally_deleted = &self.locally_deleted;
        let mut interactions: Vec<UnifiedInteraction> = merged
            .into_iter()
            .filter(|item| seen.insert(item.key()))
            .filter(|item| !locally_deleted.contains(&item.key()))
            .map(|mut item| {
                if locally_read.contains(&item.key()) {
                    item.apply_read();
                }
                item
            })
            .collect();
        interactions.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        debug!(
            "Loaded {} interactions, {} received invitations, {} sent invitations",
            interactions.len(),
            received.len(),
            sent_invitations.len()
        );

        self.interactions = interactions;
        self.invitations_received = received;
        self.invitations_sent = sent_invitations;
    }

    /// Fill in inviter display names with one batched lookup for all
    /// distinct inviter IDs across both invitation lists.
    async fn enrich_inviter_names(
        &self,
        received: &mut [Invitation],
        sent: &mut [Invitation],
    ) {
        let mut ids: Vec<String> = Vec::new();
        let mut distinct: HashSet<&str> = HashSet::new();
        for invitation in received.iter().chain(sent.iter()) {
            if invitation.inviter_name.is_none() && distinct.insert(&invitation.inviter_id) {
                ids.push(invitation.inviter_id.clone());
            }
        }
        if ids.is_empty() {
            return;
        }

        let names: HashMap<String, String> = match self.api.lookup_users_by_ids(&ids).await {
            Ok(users) => users.into_iter().map(|u| (u.id, u.name)).collect(),
            Err(err) => {
                warn!("Inviter name lookup failed, leaving names unset: {}", err);
                return;
            }
        };
        for invitation in received.iter_mut().chain(sent.iter_mut()) {
            if invitation.inviter_name.is_none() {
                invitation.inviter_name = names.get(&invitation.inviter_id).cloned();
            }
        }
    }

    fn find(&self, kind: SourceKind, id: &str) -> Option<&UnifiedInteraction> {
        self.interactions
            .iter()
            .find(|item| item.kind() == kind && item.id() == id)
    }

    /// Approve or reject a received pending join request, then reload.
    ///
    /// Approval cascades on the backend (membership creation, a notification
    /// to the requester), so the whole inbox is re-fetched rather than
    /// patching the single record.
    pub async fn review(
        &mut self,
        kind: SourceKind,
        request_id: &str,
        decision: ReviewDecision,
    ) -> Result<()> {
        let item = self
            .find(kind, request_id)
            .ok_or_else(|| Error::Other(format!("No such request: {}", request_id)))?;
        if !item.is_reviewable() {
            return Err(Error::Other(format!(
                "Request {} is not reviewable (already reviewed, or not addressed to you)",
                request_id
            )));
        }

        match kind {
            SourceKind::OrgJoinRequest => {
                self.api
                    .review_org_join_request(request_id, decision, &self.user_id)
                    .await?
            }
            SourceKind::ProjectJoinRequest => {
                self.api
                    .review_project_join_request(request_id, decision, &self.user_id)
                    .await?
            }
            SourceKind::Notification => {
                return Err(Error::Other(
                    "Notifications cannot be reviewed".to_string(),
                ));
            }
        }

        self.load_all().await;
        Ok(())
    }

    /// Mark an item read: local state first, backend write second.
    ///
    /// The local flag is kept even when the backend write fails; the returned
    /// error only tells the caller the acknowledgement did not land.
    pub async fn mark_read(&mut self, kind: SourceKind, id: &str) -> Result<()> {
        let key = InteractionKey::new(kind, id);
        let Some(index) = self
            .interactions
            .iter()
            .position(|item| item.key() == key)
        else {
            return Err(Error::Other(format!("No such item: {}", id)));
        };

        self.locally_read.insert(key);
        self.interactions[index].apply_read();

        // Pending requests have no server-side read flag yet; the local
        // overlay is all there is until the request is reviewed
        if !self.interactions[index].is_markable_read() {
            return Ok(());
        }

        let result = match kind {
            SourceKind::Notification => self.api.mark_notification_read(id).await,
            SourceKind::OrgJoinRequest | SourceKind::ProjectJoinRequest => {
                self.api.mark_join_request_read(id).await
            }
        };
        if let Err(err) = result {
            warn!("Read acknowledgement for {} failed: {}", id, err);
            return Err(err);
        }
        Ok(())
    }

    /// Delete an item: removed from the displayed list immediately, with a
    /// best-effort backend delete. A backend failure does not restore it.
    ///
    /// Pending join requests are not deletable.
    pub async fn delete(&mut self, kind: SourceKind, id: &str) -> Result<()> {
        let key = InteractionKey::new(kind, id);
        let Some(index) = self
            .interactions
            .iter()
            .position(|item| item.key() == key)
        else {
            return Err(Error::Other(format!("No such item: {}", id)));
        };
        if !self.interactions[index].is_deletable() {
            return Err(Error::Other(
                "Pending join requests cannot be deleted; review them first".to_string(),
            ));
        }

        self.interactions.remove(index);
        self.locally_deleted.insert(key);

        let result = match kind {
            SourceKind::Notification => self.api.delete_notification(id).await,
            SourceKind::OrgJoinRequest => {
                self.api.delete_org_join_requests(&[id.to_string()]).await
            }
            SourceKind::ProjectJoinRequest => {
                self.api
                    .delete_project_join_requests(&[id.to_string()])
                    .await
            }
        };
        if let Err(err) = result {
            warn!("Backend delete for {} failed, item stays dismissed: {}", id, err);
            return Err(err);
        }
        Ok(())
    }

    /// Remove every deletable item, with one batched delete per source table.
    ///
    /// Returns the number of items cleared. Backend failures are logged;
    /// cleared items stay cleared either way.
    pub async fn clear_completed(&mut self) -> usize {
        let mut by_kind: HashMap<SourceKind, Vec<String>> = HashMap::new();
        let mut kept = Vec::with_capacity(self.interactions.len());
        for item in self.interactions.drain(..) {
            if item.is_deletable() {
                let key = item.key();
                by_kind.entry(key.kind).or_default().push(key.id.clone());
                self.locally_deleted.insert(key);
            } else {
                kept.push(item);
            }
        }
        self.interactions = kept;

        let mut cleared = 0;
        for (kind, ids) in by_kind {
            cleared += ids.len();
            let result = match kind {
                SourceKind::Notification => self.api.delete_notifications(&ids).await,
                SourceKind::OrgJoinRequest => self.api.delete_org_join_requests(&ids).await,
                SourceKind::ProjectJoinRequest => {
                    self.api.delete_project_join_requests(&ids).await
                }
            };
            if let Err(err) = result {
                warn!("Batched delete for {} failed: {}", kind, err);
            }
        }
        cleared
    }

    /// Accept or reject a received invitation, then reload.
    pub async fn respond_to_invitation(
        &mut self,
        invitation_id: &str,
        response: InvitationResponse,
        message: Option<&str>,
    ) -> Result<()> {
        let invitation = self
            .invitations_received
            .iter()
            .find(|i| i.id == invitation_id)
            .ok_or_else(|| Error::Other(format!("No such invitation: {}", invitation_id)))?;
        if !invitation.is_actionable(Utc::now()) {
            return Err(Error::Other(format!(
                "Invitation {} is no longer pending",
                invitation_id
            )));
        }

        self.api
            .respond_to_invitation(invitation_id, response, message)
            .await?;
        self.load_all().await;
        Ok(())
    }
}

fn unwrap_or_empty<T>(label: &str, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            warn!("Failed to load {}, continuing without it: {}", label, err);
            Vec::new()
        }
    }
}
