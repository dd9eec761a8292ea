//! Reusable formatting utilities for CLI output
//!
//! Common display helpers for timestamps, statuses, and long text used across
//! multiple commands.

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::client::models::{InvitationStatus, RequestStatus};

/// Format a timestamp as a short relative age.
///
/// # Example output
/// - `just now`
/// - `5m ago`
/// - `3h ago`
/// - `2d ago`
/// - `2026-07-01` (older than 30 days)
pub fn format_relative_time(at: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(at);
    let secs = elapsed.num_seconds();

    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else if secs < 30 * 86400 {
        format!("{}d ago", secs / 86400)
    } else {
        at.format("%Y-%m-%d").to_string()
    }
}

/// Colorize a join request status for terminal display
pub fn format_request_status(status: RequestStatus) -> String {
    match status {
        RequestStatus::Pending => "pending".yellow().to_string(),
        RequestStatus::Approved => "approved".green().to_string(),
        RequestStatus::Rejected => "rejected".red().to_string(),
    }
}

/// Colorize an invitation status for terminal display
pub fn format_invitation_status(status: InvitationStatus) -> String {
    match status {
        InvitationStatus::Pending => "pending".yellow().to_string(),
        InvitationStatus::Accepted => "accepted".green().to_string(),
        InvitationStatus::Rejected => "rejected".red().to_string(),
        InvitationStatus::Expired => "expired".dimmed().to_string(),
    }
}

/// Truncate text for table cells, appending an ellipsis when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}
