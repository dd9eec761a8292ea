//! CLI command definitions and handlers

use clap::{Parser, Subcommand, ValueEnum};

pub mod cache;
pub mod context;
pub mod inbox;
pub mod init;
pub mod org;
pub mod project;
pub mod status;
pub mod task;

pub use context::CommandContext;

use crate::inbox::SourceKind;

/// Output format options
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format - one row per entry (default)
    #[default]
    Table,
    /// JSON format - structured for scripts/APIs
    Json,
}

/// Inbox item kind, mapping to the backing source table
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ItemKind {
    /// Organization join request
    OrgRequest,
    /// Project join request
    ProjectRequest,
    /// Notification
    Notification,
}

impl From<ItemKind> for SourceKind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::OrgRequest => SourceKind::OrgJoinRequest,
            ItemKind::ProjectRequest => SourceKind::ProjectJoinRequest,
            ItemKind::Notification => SourceKind::Notification,
        }
    }
}

/// Crewdeck CLI - Command-line companion for the Crewdeck collaboration platform
#[derive(Parser, Debug)]
#[command(name = "crewdeck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "CREWDECK_FORMAT",
        default_value = "table",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override default organization
    #[arg(long, global = true, env = "CREWDECK_ORG_ID", hide_env = true)]
    pub org: Option<String>,

    /// Override config file location
    #[arg(long, global = true, env = "CREWDECK_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "CREWDECK_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass cache, fetch fresh data from API
    #[arg(long, global = true, env = "CREWDECK_NO_CACHE", hide_env = true)]
    pub no_cache: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Crewdeck configuration
    Init,

    /// Show authentication and configuration status
    Status,

    /// Display version information
    Version,

    /// Manage organizations
    #[command(subcommand)]
    Org(OrgCommands),

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommands),

    /// View and act on your unified inbox
    #[command(subcommand)]
    Inbox(InboxCommands),

    /// Manage the in-process response cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

/// Organization management subcommands
#[derive(Subcommand, Debug)]
pub enum OrgCommands {
    /// List all organizations you belong to
    List,

    /// Set default organization
    Set {
        /// Organization ID to set as default
        org_id: String,
    },

    /// Show current default organization
    Get,
}

/// Project management subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects in the default organization
    List,
}

/// Task management subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks in a project
    List {
        /// Project ID
        project_id: String,
    },
}

/// Inbox subcommands
#[derive(Subcommand, Debug)]
pub enum InboxCommands {
    /// Show the unified inbox: requests, notifications, and invitations
    List,

    /// Show the total unread count
    Unread,

    /// Watch the unread count, printing changes as they arrive
    Watch,

    /// Approve or reject a pending join request
    Review {
        /// Which source table the request belongs to
        #[arg(value_enum)]
        kind: ItemKind,

        /// Request ID
        id: String,

        /// Approve the request
        #[arg(long, conflicts_with = "reject")]
        approve: bool,

        /// Reject the request
        #[arg(long)]
        reject: bool,
    },

    /// Mark an inbox item as read
    Read {
        /// Which source table the item belongs to
        #[arg(value_enum)]
        kind: ItemKind,

        /// Item ID
        id: String,
    },

    /// Delete an inbox item
    Delete {
        /// Which source table the item belongs to
        #[arg(value_enum)]
        kind: ItemKind,

        /// Item ID
        id: String,
    },

    /// Delete every reviewed request and notification
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Accept or decline an invitation
    Respond {
        /// Invitation ID
        id: String,

        /// Accept the invitation
        #[arg(long, conflicts_with = "reject")]
        accept: bool,

        /// Decline the invitation
        #[arg(long)]
        reject: bool,

        /// Optional message to the inviter
        #[arg(long)]
        message: Option<String>,
    },
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Stats,

    /// Clear all cache entries
    Clear,
}
