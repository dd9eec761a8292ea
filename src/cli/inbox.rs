//! Inbox commands: the unified request/notification/invitation view

use std::time::Duration;

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CommandContext, ItemKind, OutputFormat};
use crate::client::PushHub;
use crate::client::models::{Invitation, InvitationResponse, ReviewDecision};
use crate::error::{Error, Result};
use crate::inbox::{
    Direction, InteractionAggregator, SourceKind, UnifiedInteraction, UnreadWatcher,
    compute_unread_count,
};
use crate::output::formatters::{
    format_invitation_status, format_relative_time, format_request_status, truncate,
};
use crate::output::{json, table};

/// Display format for unified inbox items
#[derive(Tabled, Serialize)]
struct InboxRow {
    #[tabled(rename = "KIND")]
    kind: String,

    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "SUMMARY")]
    summary: String,

    #[tabled(rename = "STATUS")]
    status: String,

    #[tabled(rename = "AGE")]
    age: String,
}

impl From<&UnifiedInteraction> for InboxRow {
    fn from(item: &UnifiedInteraction) -> Self {
        let status = match item.request_status() {
            Some(s) => {
                let mut label = format_request_status(s);
                if item.direction == Direction::Sent {
                    label = format!("{} (sent)", label);
                }
                label
            }
            None => {
                if item.is_read() {
                    "read".dimmed().to_string()
                } else {
                    "unread".bold().to_string()
                }
            }
        };
        Self {
            kind: item.kind().to_string(),
            id: item.id().to_string(),
            summary: truncate(&item.summary(), 60),
            status,
            age: format_relative_time(item.created_at()),
        }
    }
}

/// Display format for invitations
#[derive(Tabled, Serialize)]
struct InvitationRow {
    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "FROM")]
    from: String,

    #[tabled(rename = "TARGET")]
    target: String,

    #[tabled(rename = "STATUS")]
    status: String,

    #[tabled(rename = "AGE")]
    age: String,
}

impl From<&Invitation> for InvitationRow {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id.clone(),
            from: invitation
                .inviter_name
                .clone()
                .unwrap_or_else(|| invitation.inviter_id.clone()),
            target: invitation.target_name.clone(),
            status: format_invitation_status(invitation.effective_status(chrono::Utc::now())),
            age: format_relative_time(invitation.created_at),
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

async fn loaded_aggregator(ctx: &CommandContext) -> Result<InteractionAggregator> {
    let user_id = ctx.config.require_user_id()?.to_string();
    let email = ctx.config.require_email()?.to_string();

    let mut aggregator = InteractionAggregator::new(ctx.api(), user_id, email);
    let bar = spinner("Loading inbox...");
    aggregator.load_all().await;
    bar.finish_and_clear();
    Ok(aggregator)
}

/// Show the unified inbox
pub async fn list(ctx: &CommandContext) -> Result<()> {
    let aggregator = loaded_aggregator(ctx).await?;

    let rows: Vec<InboxRow> = aggregator.interactions().iter().map(|i| i.into()).collect();
    let invitation_rows: Vec<InvitationRow> = aggregator
        .invitations_received()
        .iter()
        .map(|i| i.into())
        .collect();

    match ctx.format {
        OutputFormat::Table => {
            println!("{}", "Inbox".bold());
            println!("{}", table::format_table(&rows));
            if !invitation_rows.is_empty() {
                println!("\n{}", "Invitations".bold());
                println!("{}", table::format_table(&invitation_rows));
            }
        }
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "interactions": rows,
                "invitations": invitation_rows,
            });
            println!("{}", json::format_json(&payload)?);
        }
    }

    Ok(())
}

/// Show the total unread count
pub async fn unread(ctx: &CommandContext) -> Result<()> {
    let user_id = ctx.config.require_user_id()?;
    let email = ctx.config.require_email()?;

    let count = compute_unread_count(&ctx.api(), user_id, email).await;

    match ctx.format {
        OutputFormat::Table => {
            if count == 0 {
                println!("No unread items.");
            } else {
                println!("{} unread", count.to_string().bold());
            }
        }
        OutputFormat::Json => {
            println!("{}", json::format_json(&serde_json::json!({ "unread": count }))?);
        }
    }

    Ok(())
}

/// Watch the unread count until interrupted
pub async fn watch(ctx: &CommandContext) -> Result<()> {
    let user_id = ctx.config.require_user_id()?.to_string();
    let email = ctx.config.require_email()?.to_string();
    let poll_interval = match ctx.config.preferences.poll_interval_secs {
        0 => crate::inbox::DEFAULT_POLL_INTERVAL,
        secs => Duration::from_secs(secs),
    };

    // Without a realtime transport attached the hub stays silent and the
    // fallback poll does all the work
    let hub = PushHub::new();
    let watcher = UnreadWatcher::spawn(ctx.api(), &hub, user_id, email, poll_interval);
    let mut rx = watcher.counts();

    println!("Watching unread count (Ctrl-C to stop)...");
    let mut last: Option<usize> = None;
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let count = *rx.borrow();
                if last != Some(count) {
                    println!("{} unread", count);
                    last = Some(count);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

/// Approve or reject a pending join request
pub async fn review(
    ctx: &CommandContext,
    kind: ItemKind,
    id: &str,
    approve: bool,
    reject: bool,
) -> Result<()> {
    let decision = match (approve, reject) {
        (true, false) => ReviewDecision::Approve,
        (false, true) => ReviewDecision::Reject,
        _ => {
            return Err(Error::Other(
                "Pass exactly one of --approve or --reject".to_string(),
            ));
        }
    };
    if matches!(kind, ItemKind::Notification) {
        return Err(Error::Other("Notifications cannot be reviewed".to_string()));
    }

    let mut aggregator = loaded_aggregator(ctx).await?;
    let source_kind: SourceKind = kind.into();
    let target_id = aggregator
        .interactions()
        .iter()
        .find(|i| i.kind() == source_kind && i.id() == id)
        .and_then(|i| i.target_id().map(String::from));
    aggregator.review(source_kind, id, decision).await?;

    // Membership-dependent listings for the reviewed org or project are stale
    if let Some(target_id) = target_id {
        ctx.cache.clear_scope(&target_id, None);
    }

    let verb = match decision {
        ReviewDecision::Approve => "approved",
        ReviewDecision::Reject => "rejected",
    };
    println!("{} Request {} {}", "✓".green(), id, verb);
    Ok(())
}

/// Mark an inbox item read
pub async fn read(ctx: &CommandContext, kind: ItemKind, id: &str) -> Result<()> {
    let mut aggregator = loaded_aggregator(ctx).await?;

    match aggregator.mark_read(kind.into(), id).await {
        Ok(()) => {
            println!("{} Marked {} as read", "✓".green(), id);
            Ok(())
        }
        Err(Error::Other(msg)) => Err(Error::Other(msg)),
        Err(err) => {
            // Local state is kept; the acknowledgement just didn't land
            println!(
                "{} Marked {} as read locally; sync failed: {}",
                "⚠".yellow(),
                id,
                err
            );
            Ok(())
        }
    }
}

/// Delete an inbox item
pub async fn delete(ctx: &CommandContext, kind: ItemKind, id: &str) -> Result<()> {
    let mut aggregator = loaded_aggregator(ctx).await?;

    match aggregator.delete(kind.into(), id).await {
        Ok(()) => {
            println!("{} Deleted {}", "✓".green(), id);
            Ok(())
        }
        Err(Error::Other(msg)) => Err(Error::Other(msg)),
        Err(err) => {
            println!(
                "{} Dismissed {} locally; backend delete failed: {}",
                "⚠".yellow(),
                id,
                err
            );
            Ok(())
        }
    }
}

/// Delete every reviewed request and notification
pub async fn clear(ctx: &CommandContext, yes: bool) -> Result<()> {
    let mut aggregator = loaded_aggregator(ctx).await?;

    let eligible = aggregator
        .interactions()
        .iter()
        .filter(|i| i.is_deletable())
        .count();
    if eligible == 0 {
        println!("Nothing to clear.");
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {} completed items?", eligible))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let cleared = aggregator.clear_completed().await;
    println!("{} Cleared {} items", "✓".green(), cleared);
    Ok(())
}

/// Accept or decline an invitation
pub async fn respond(
    ctx: &CommandContext,
    id: &str,
    accept: bool,
    reject: bool,
    message: Option<&str>,
) -> Result<()> {
    let response = match (accept, reject) {
        (true, false) => InvitationResponse::Accept,
        (false, true) => InvitationResponse::Reject,
        _ => {
            return Err(Error::Other(
                "Pass exactly one of --accept or --reject".to_string(),
            ));
        }
    };

    let mut aggregator = loaded_aggregator(ctx).await?;
    let target_id = aggregator
        .invitations_received()
        .iter()
        .find(|i| i.id == id)
        .map(|i| i.target_id.clone());
    aggregator.respond_to_invitation(id, response, message).await?;

    // Accepting changes what the user can see in the target and their own
    // membership list
    if matches!(response, InvitationResponse::Accept)
        && let Some(target_id) = target_id
    {
        ctx.cache
            .clear_scope(&target_id, Some(ctx.config.require_user_id()?));
    }

    let verb = match response {
        InvitationResponse::Accept => "accepted",
        InvitationResponse::Reject => "declined",
    };
    println!("{} Invitation {} {}", "✓".green(), id, verb);
    Ok(())
}
