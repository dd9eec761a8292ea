//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Password, Select, theme::ColorfulTheme};

use crate::client::{AuthApi, CrewdeckClient, DirectoryApi};
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Prompts for an API key, verifies it against the backend, and stores the
/// resulting identity (user ID, email, session token) plus an optional
/// default organization.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}", "Welcome to Crewdeck!".bold().green());
    println!("Let's set up your configuration.\n");

    let api_key: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter your Crewdeck API key")
        .interact()?;

    println!("\n{}", "Authenticating...".cyan());
    let client = CrewdeckClient::new(Some(api_key.clone()))?;
    let session = client.authenticate(&api_key).await?;
    client.set_session(session.clone()).await;

    println!("{}", "✓ Authentication successful!".green());

    println!("\n{}", "Fetching your organizations...".cyan());
    let orgs = client.list_user_orgs(&session.user_id).await?;

    let org_id = if orgs.is_empty() {
        println!("{}", "⚠ No organizations found.".yellow());
        None
    } else if orgs.len() == 1 {
        let org = &orgs[0];
        println!("Found organization: {}", org.name.bold());
        let use_org = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Set this as your default organization?")
            .default(true)
            .interact()?;

        if use_org { Some(org.id.clone()) } else { None }
    } else {
        let org_names: Vec<String> = orgs.iter().map(|o| o.name.clone()).collect();

        println!("Found {} organizations.", orgs.len());
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select your default organization")
            .items(&org_names)
            .default(0)
            .interact_opt()?;

        selection.map(|idx| orgs[idx].id.clone())
    };

    let mut config = Config::load_at(config_path).unwrap_or_default();
    config.api_key = Some(api_key);
    config.org_id = org_id;
    config.user_id = Some(session.user_id.clone());
    config.email = Some(session.email.clone());
    config.session = Some(crate::config::SessionToken {
        token: session.token,
        expires_at: session.expires_at,
    });
    config.save_at(config_path)?;

    println!("\n{}", "✓ Configuration saved!".green());
    println!("Signed in as {}", session.email.bold());
    println!("Try `crewdeck inbox list` to see what's waiting for you.");

    Ok(())
}
