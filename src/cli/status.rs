//! Status command implementation

use colored::Colorize;

use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}\n", "Crewdeck Configuration Status".bold());

    match Config::load_at(config_path) {
        Ok(config) => {
            let path = Config::resolve_path(config_path)?;
            println!("Config file: {}", path.display().to_string().cyan());
            println!();

            if config.api_key.is_some() {
                println!("{} API key configured", "✓".green());
            } else {
                println!("{} API key not configured", "✗".red());
                println!("  → Run 'crewdeck init' to configure");
            }

            if let Some(ref email) = config.email {
                println!("{} Signed in as {}", "✓".green(), email);
            } else {
                println!("{} No user identity stored", "○".dimmed());
            }

            if let Some(ref session) = config.session {
                if config.is_session_expired() {
                    println!(
                        "{} Session expired (will refresh on next command)",
                        "⚠".yellow()
                    );
                } else {
                    let remaining = session.expires_at.signed_duration_since(chrono::Utc::now());
                    let hours = remaining.num_hours();
                    let mins = remaining.num_minutes() % 60;
                    println!(
                        "{} Session valid (expires in {}h {}m)",
                        "✓".green(),
                        hours,
                        mins
                    );
                }
            } else {
                println!(
                    "{} No cached session (will authenticate on next command)",
                    "○".dimmed()
                );
            }

            if let Some(ref org_id) = config.org_id {
                println!("{} Default organization: {}", "✓".green(), org_id);
            } else {
                println!("{} No default organization set", "○".dimmed());
                println!("  → Run 'crewdeck org set <ID>' to set one");
            }
        }
        Err(err) => {
            println!("{} Not configured: {}", "✗".red(), err);
            println!("  → Run 'crewdeck init' to get started");
        }
    }

    Ok(())
}
