use anyhow::Result;
use calstat_core::categories::category_report;
use calstat_core::config::CalstatConfig;

use crate::render::render_report;
use crate::source::{SourceArgs, load_events};

pub async fn run(config: &CalstatConfig, source: &SourceArgs) -> Result<()> {
    if config.categories.is_empty() {
        anyhow::bail!(
            "No categories configured.\n\n\
            Add some to {}:\n\n  \
            [[categories]]\n  \
            name = \"Sport\"\n  \
            keywords = [\"gym\", \"run\"]",
            CalstatConfig::config_path()?.display()
        );
    }

    let events = load_events(config, source, None).await?;
    let report = category_report(&events, &config.categories);

    for line in render_report(&report, &config.palette()?) {
        println!("{}", line);
    }

    Ok(())
}
