//! Task listing commands

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::DirectoryApi;
use crate::client::models::Task;
use crate::error::Result;
use crate::output::{json, table};

/// Display format for tasks in table view
#[derive(Tabled, Serialize)]
struct TaskDisplay {
    #[tabled(rename = "TASK ID")]
    id: String,

    #[tabled(rename = "TITLE")]
    title: String,

    #[tabled(rename = "STATUS")]
    status: String,
}

impl From<Task> for TaskDisplay {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            status: task.status.unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// List tasks in a project
pub async fn list(ctx: &CommandContext, project_id: &str) -> Result<()> {
    let client = ctx.client.clone();
    let pid = project_id.to_string();
    let tasks: Vec<Task> = ctx
        .cache
        .project_tasks(project_id, || async move { client.list_tasks(&pid).await })
        .await?;

    let display: Vec<TaskDisplay> = tasks.into_iter().map(|t| t.into()).collect();
    match ctx.format {
        OutputFormat::Table => println!("{}", table::format_table(&display)),
        OutputFormat::Json => println!("{}", json::format_json(&display)?),
    }

    Ok(())
}
