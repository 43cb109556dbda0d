use anyhow::Result;
use calstat_core::config::CalstatConfig;
use calstat_provider_google::fetch_calendars;
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::source::open_session;
use crate::utils::create_spinner;

pub async fn run(config: &CalstatConfig) -> Result<()> {
    let session = open_session(config).await?;

    let spinner = create_spinner("Fetching calendars".to_string());
    let calendars = fetch_calendars(&session).await;
    spinner.finish_and_clear();

    let calendars = calendars?;

    if calendars.is_empty() {
        println!("{}", "No calendars found".dimmed());
        return Ok(());
    }

    for calendar in &calendars {
        let line = format!("{} {}", calendar.render(), format!("[{}]", calendar.id).dimmed());
        if config.includes_calendar(&calendar.id) {
            println!("{}", line);
        } else {
            println!("{} {}", line, "(excluded)".dimmed());
        }
    }

    Ok(())
}
