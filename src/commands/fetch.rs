use std::path::Path;

use anyhow::{Context, Result};
use calstat_core::config::CalstatConfig;

use crate::render::pluralize;
use crate::source::{SourceArgs, fetch_snapshot};

pub async fn run(config: &CalstatConfig, source: &SourceArgs, output: &Path) -> Result<()> {
    if source.input.is_some() {
        anyhow::bail!("`calstat fetch` always reads from Google; --input is not supported here");
    }

    let range = source.range(config)?;
    let snapshot = fetch_snapshot(config, source.calendar.as_deref(), range).await?;

    snapshot
        .save(output)
        .with_context(|| format!("Failed to write snapshot to {}", output.display()))?;

    let records = snapshot.record_count();
    let calendars = snapshot.calendars.len();
    println!(
        "Saved {} {} from {} {} ({}) to {}",
        records,
        pluralize("event", records),
        calendars,
        pluralize("calendar", calendars),
        range,
        output.display()
    );

    Ok(())
}
