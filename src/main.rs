//! Crewdeck CLI - Command-line companion for the Crewdeck collaboration platform

use clap::Parser;

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod inbox;
mod output;

use cli::{
    CacheCommands, Cli, Commands, CommandContext, InboxCommands, OrgCommands, ProjectCommands,
    TaskCommands,
};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn context(cli: &Cli) -> Result<CommandContext> {
    CommandContext::new(
        cli.format,
        cli.org.as_deref(),
        cli.config.as_deref(),
        cli.no_cache,
    )
    .await
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .init();

    match cli.command {
        Commands::Init => cli::init::run(cli.config.as_deref()).await,
        Commands::Status => cli::status::run(cli.config.as_deref()),
        Commands::Version => {
            println!("crewdeck version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Org(ref org_cmd) => match org_cmd {
            OrgCommands::List => {
                let ctx = context(&cli).await?;
                cli::org::list(&ctx).await
            }
            OrgCommands::Set { org_id } => {
                cli::org::set(org_id.clone(), cli.config.as_deref()).await
            }
            OrgCommands::Get => {
                let ctx = context(&cli).await?;
                cli::org::get(&ctx).await
            }
        },
        Commands::Project(ref project_cmd) => match project_cmd {
            ProjectCommands::List => {
                let ctx = context(&cli).await?;
                cli::project::list(&ctx).await
            }
        },
        Commands::Task(ref task_cmd) => match task_cmd {
            TaskCommands::List { project_id } => {
                let ctx = context(&cli).await?;
                cli::task::list(&ctx, project_id).await
            }
        },
        Commands::Inbox(ref inbox_cmd) => {
            let ctx = context(&cli).await?;
            match inbox_cmd {
                InboxCommands::List => cli::inbox::list(&ctx).await,
                InboxCommands::Unread => cli::inbox::unread(&ctx).await,
                InboxCommands::Watch => cli::inbox::watch(&ctx).await,
                InboxCommands::Review {
                    kind,
                    id,
                    approve,
                    reject,
                } => cli::inbox::review(&ctx, *kind, id, *approve, *reject).await,
                InboxCommands::Read { kind, id } => cli::inbox::read(&ctx, *kind, id).await,
                InboxCommands::Delete { kind, id } => cli::inbox::delete(&ctx, *kind, id).await,
                InboxCommands::Clear { yes } => cli::inbox::clear(&ctx, *yes).await,
                InboxCommands::Respond {
                    id,
                    accept,
                    reject,
                    message,
                } => cli::inbox::respond(&ctx, id, *accept, *reject, message.as_deref()).await,
            }
        }
        Commands::Cache(ref cache_cmd) => {
            // The cache lives in process memory; these act on a fresh instance
            let cache = cache::ScopedCache::default();
            match cache_cmd {
                CacheCommands::Stats => cli::cache::stats(&cache, cli.format),
                CacheCommands::Clear => cli::cache::clear(&cache, cli.format),
            }
        }
    }
}
