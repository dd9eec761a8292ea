//! Organization management commands

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::DirectoryApi;
use crate::client::models::Organization;
use crate::config::Config;
use crate::error::Result;
use crate::output::{json, table};

/// Display format for organizations in table view
#[derive(Tabled, Serialize)]
struct OrgDisplay {
    #[tabled(rename = "ORG ID")]
    id: String,

    #[tabled(rename = "NAME")]
    name: String,

    #[tabled(rename = "MEMBERS")]
    members: String,

    #[tabled(rename = "PROJECTS")]
    projects: String,
}

impl From<Organization> for OrgDisplay {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
            members: org
                .member_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
            projects: org
                .project_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// List all organizations the signed-in user belongs to
pub async fn list(ctx: &CommandContext) -> Result<()> {
    let user_id = ctx.config.require_user_id()?.to_string();

    let client = ctx.client.clone();
    let uid = user_id.clone();
    let orgs: Vec<Organization> = ctx
        .cache
        .user_membership(&user_id, || async move { client.list_user_orgs(&uid).await })
        .await?;

    let display: Vec<OrgDisplay> = orgs.into_iter().map(|o| o.into()).collect();
    match ctx.format {
        OutputFormat::Table => println!("{}", table::format_table(&display)),
        OutputFormat::Json => println!("{}", json::format_json(&display)?),
    }

    Ok(())
}

/// Set the default organization
pub async fn set(org_id: String, config_path: Option<&str>) -> Result<()> {
    let mut config = Config::load_at(config_path)?;
    config.org_id = Some(org_id.clone());
    config.save_at(config_path)?;

    println!("{} Default organization set to {}", "✓".green(), org_id);
    Ok(())
}

/// Show the current default organization
pub async fn get(ctx: &CommandContext) -> Result<()> {
    let org_id = ctx.require_org_id()?.to_string();

    let client = ctx.client.clone();
    let oid = org_id.clone();
    let org = ctx
        .cache
        .org_metadata(&org_id, || async move { client.get_org(&oid).await })
        .await?;

    let display = vec![OrgDisplay::from(org)];
    match ctx.format {
        OutputFormat::Table => println!("{}", table::format_table(&display)),
        OutputFormat::Json => println!("{}", json::format_json(&display)?),
    }

    Ok(())
}
