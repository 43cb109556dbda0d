use anyhow::Result;
use calstat_core::config::CalstatConfig;
use calstat_core::{DateRange, EventList};
use chrono::{Datelike, Local, NaiveDate, Utc};
use owo_colors::OwoColorize;

use crate::render::{Render, format_minutes, paint};
use crate::source::{SourceArgs, load_events};

pub async fn run(config: &CalstatConfig, source: &SourceArgs, offset: i64) -> Result<()> {
    let range = week_range(offset)?;
    let events = load_events(config, source, Some(range)).await?.sorted_by_start();

    let week = range.from.date_naive().iso_week();
    println!(
        "{}\n",
        format!("Week {} of {} ({})", week.week(), week.year(), range).bold()
    );

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let palette = config.palette()?;
    let colors = palette.assign(events.iter().map(|e| e.calendar.name.clone()));

    for (day, day_events) in by_day(&events) {
        println!(
            "{} {}",
            format_date_label(day, Local::now().date_naive()).bold(),
            format!("({})", format_minutes(day_events.sum_duration())).dimmed()
        );

        for event in &day_events {
            let line = event.render();
            match colors.get(&event.calendar.name) {
                Some(&color) => println!("  {} {}", paint("●", color), line),
                None => println!("  {}", line),
            }
        }
        println!();
    }

    println!("{} total", format_minutes(events.sum_duration()).bold());

    Ok(())
}

fn week_range(offset: i64) -> Result<DateRange> {
    DateRange::week_of(Utc::now(), offset)
        .ok_or_else(|| anyhow::anyhow!("Week offset {} is out of range", offset))
}

/// Consecutive runs of events sharing a start date.
fn by_day(events: &EventList) -> Vec<(NaiveDate, EventList)> {
    let mut days: Vec<(NaiveDate, EventList)> = Vec::new();

    for event in events {
        let day = event.start.date();
        match days.last_mut() {
            Some((current, list)) if *current == day => list.extend([event.clone()]),
            _ => days.push((day, EventList::new(vec![event.clone()]))),
        }
    }

    days
}

/// "Today", "Tomorrow", "Yesterday" or e.g. "Wed Feb 25".
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}
