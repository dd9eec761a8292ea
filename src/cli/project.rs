//! Project listing commands

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::DirectoryApi;
use crate::client::models::Project;
use crate::error::Result;
use crate::output::{json, table};

/// Display format for projects in table view
#[derive(Tabled, Serialize)]
struct ProjectDisplay {
    #[tabled(rename = "PROJECT ID")]
    id: String,

    #[tabled(rename = "NAME")]
    name: String,

    #[tabled(rename = "VISIBILITY")]
    visibility: String,
}

impl From<Project> for ProjectDisplay {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            visibility: if project.is_public {
                "public".to_string()
            } else {
                "private".to_string()
            },
        }
    }
}

/// List projects in the default organization visible to the signed-in user
pub async fn list(ctx: &CommandContext) -> Result<()> {
    let org_id = ctx.require_org_id()?.to_string();
    let user_id = ctx.config.require_user_id()?.to_string();

    let client = ctx.client.clone();
    let (oid, uid) = (org_id.clone(), user_id.clone());
    let projects: Vec<Project> = ctx
        .cache
        .org_projects(&org_id, &user_id, || async move {
            client.list_projects(&oid, &uid).await
        })
        .await?;

    let display: Vec<ProjectDisplay> = projects.into_iter().map(|p| p.into()).collect();
    match ctx.format {
        OutputFormat::Table => println!("{}", table::format_table(&display)),
        OutputFormat::Json => println!("{}", json::format_json(&display)?),
    }

    Ok(())
}
