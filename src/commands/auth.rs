use anyhow::Result;
use calstat_core::config::CalstatConfig;
use calstat_provider_google::{Session, authenticate, fetch_calendars};
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run(config: &mut CalstatConfig) -> Result<()> {
    println!("Authenticating with Google...");

    let account = authenticate().await?;

    println!("Authenticated as: {}\n", account);

    if config.set_account_if_unset(&account)? {
        println!("Saved {} as the default account.", account);
    } else if config.google_account.as_deref() != Some(account.as_str()) {
        println!(
            "{}",
            format!(
                "Note: the config file still uses {}.",
                config.google_account.as_deref().unwrap_or_default()
            )
            .yellow()
        );
    }

    let session = Session::load_valid(&account).await?;
    let calendars = fetch_calendars(&session).await?;

    if calendars.is_empty() {
        println!("No calendars found.");
        return Ok(());
    }

    println!("Found {} calendar(s):\n", calendars.len());
    for calendar in &calendars {
        println!("  {}", calendar.render());
    }

    println!("\nRun `calstat report` to see where your time goes.");

    Ok(())
}
