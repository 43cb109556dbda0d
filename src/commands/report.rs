use std::path::PathBuf;

use anyhow::{Context, Result};
use calstat_core::config::CalstatConfig;
use calstat_core::report::{Grouping, RankBy};
use calstat_core::snapshot::ReportSnapshot;
use calstat_core::{EventList, ReportOptions, build_report};
use clap::ValueEnum;
use owo_colors::OwoColorize;

use crate::render::{format_minutes, pluralize, render_report};
use crate::source::{SourceArgs, load_events};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankArg {
    Duration,
    Count,
}

impl From<RankArg> for RankBy {
    fn from(arg: RankArg) -> Self {
        match arg {
            RankArg::Duration => RankBy::Duration,
            RankArg::Count => RankBy::Count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupArg {
    /// Case, punctuation and word order are ignored
    Tokenized,
    /// Exact titles
    Summary,
}

impl From<GroupArg> for Grouping {
    fn from(arg: GroupArg) -> Self {
        match arg {
            GroupArg::Tokenized => Grouping::Tokenized,
            GroupArg::Summary => Grouping::Summary,
        }
    }
}

#[derive(Debug, Default)]
pub struct ReportArgs {
    pub min: Option<usize>,
    pub rank_by: Option<RankArg>,
    pub by: Option<GroupArg>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub json: Option<PathBuf>,
}

impl ReportArgs {
    fn options(&self, config: &CalstatConfig) -> ReportOptions {
        let defaults = config.report_options();
        ReportOptions {
            min_occurrences: self.min.unwrap_or(defaults.min_occurrences),
            rank_by: self.rank_by.map(RankBy::from).unwrap_or(defaults.rank_by),
            grouping: self.by.map(Grouping::from).unwrap_or(defaults.grouping),
            limit: self.limit.or(defaults.limit),
        }
    }
}

pub async fn run(config: &CalstatConfig, source: &SourceArgs, args: ReportArgs) -> Result<()> {
    let events = load_events(config, source, None).await?;
    let options = args.options(config);

    let report = build_report(&events, &options);
    let total = events.sum_duration();

    println!(
        "{} over {} {}\n",
        format!("{} total", format_minutes(total)).bold(),
        events.len(),
        pluralize("event", events.len())
    );

    if report.is_empty() {
        println!(
            "{}",
            format!(
                "No event occurs more than {} {}",
                options.min_occurrences,
                pluralize("time", options.min_occurrences)
            )
            .dimmed()
        );
    } else {
        for line in render_report(&report, &config.palette()?) {
            println!("{}", line);
        }
    }

    if let Some(query) = &args.search {
        println!("\n{}", render_search(&events, query));
    }

    if let Some(path) = &args.json {
        ReportSnapshot::new(&report, total)
            .save(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("\nReport written to {}", path.display());
    }

    Ok(())
}

fn render_search(events: &EventList, query: &str) -> String {
    let matches = events.matching(query);
    format!(
        "Time spent on \"{}\": {} ({} {})",
        query,
        format_minutes(matches.sum_duration()).bold(),
        matches.len(),
        pluralize("event", matches.len())
    )
}
