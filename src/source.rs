//! Where events come from: a live Google fetch or a saved record snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use calstat_core::config::CalstatConfig;
use calstat_core::snapshot::{CalendarRecords, RecordSnapshot};
use calstat_core::{Calendar, DateRange, EventList};
use calstat_provider_google::{Session, fetch_calendars, fetch_event_records};
use chrono::Utc;
use clap::Args;
use tracing::info;

use crate::render::Render;
use crate::utils::create_spinner;

#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Only use this calendar (by id or name)
    #[arg(short, long)]
    pub calendar: Option<String>,

    /// Read events from a snapshot written by `calstat fetch` instead of Google
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Days before today to include
    #[arg(long)]
    pub days_past: Option<u32>,

    /// Days after today to include
    #[arg(long)]
    pub days_future: Option<u32>,
}

impl SourceArgs {
    /// The analysis window, flags overriding the config file.
    pub fn range(&self, config: &CalstatConfig) -> Result<DateRange> {
        let days_past = self.days_past.unwrap_or(config.days_in_past);
        let days_future = self.days_future.unwrap_or(config.days_in_future);

        DateRange::around_now(days_past, days_future).ok_or_else(|| {
            anyhow::anyhow!(
                "Time window of {} days back and {} days ahead is out of range",
                days_past,
                days_future
            )
        })
    }

    /// The window if one was asked for on the command line.
    fn explicit_range(&self, config: &CalstatConfig) -> Result<Option<DateRange>> {
        if self.days_past.is_some() || self.days_future.is_some() {
            self.range(config).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Load events from the source selected by `source`.
///
/// `range` overrides the window derived from flags and config. Snapshots
/// are only narrowed down when a window was asked for, otherwise every
/// saved event is used.
pub async fn load_events(
    config: &CalstatConfig,
    source: &SourceArgs,
    range: Option<DateRange>,
) -> Result<EventList> {
    match &source.input {
        Some(path) => {
            let snapshot = RecordSnapshot::load(path)
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            info!(
                path = %path.display(),
                records = snapshot.record_count(),
                fetched_at = %snapshot.fetched_at,
                "Loaded snapshot"
            );

            let events = parse_snapshot(&snapshot);
            let events = match source.calendar.as_deref() {
                Some(wanted) => events.filter(|e| calendar_matches(&e.calendar, wanted)),
                None => events,
            };

            let range = match range {
                Some(range) => Some(range),
                None => source.explicit_range(config)?,
            };

            Ok(match range {
                Some(range) => events.within(&range),
                None => events,
            })
        }
        None => {
            let range = match range {
                Some(range) => range,
                None => source.range(config)?,
            };
            let snapshot = fetch_snapshot(config, source.calendar.as_deref(), range).await?;
            Ok(parse_snapshot(&snapshot))
        }
    }
}

fn parse_snapshot(snapshot: &RecordSnapshot) -> EventList {
    // Malformed records are already logged per calendar
    let (events, _skipped) = snapshot.events();
    events
}

fn calendar_matches(calendar: &Calendar, wanted: &str) -> bool {
    calendar.id == wanted || calendar.name == wanted
}

/// Open the session of the configured account, refreshing it if needed.
pub async fn open_session(config: &CalstatConfig) -> Result<Session> {
    let account = config.google_account.as_deref().ok_or_else(|| {
        anyhow::anyhow!(
            "No Google account configured.\n\n\
            Sign in with:\n  \
            calstat auth"
        )
    })?;

    Session::load_valid(account).await
}

/// Fetch raw records of the selected calendars within `range`.
pub async fn fetch_snapshot(
    config: &CalstatConfig,
    calendar_filter: Option<&str>,
    range: DateRange,
) -> Result<RecordSnapshot> {
    let session = open_session(config).await?;

    let spinner = create_spinner("Fetching calendars".to_string());
    let calendars = fetch_calendars(&session).await;
    spinner.finish_and_clear();

    let calendars = select_calendars(calendars?, config, calendar_filter)?;

    let mut entries = Vec::with_capacity(calendars.len());
    for calendar in calendars {
        let spinner = create_spinner(calendar.render());
        let records = fetch_event_records(&session, &calendar.id, &range).await;
        spinner.finish_and_clear();

        let records = records?;
        info!(calendar = %calendar.id, records = records.len(), "Fetched records");
        entries.push(CalendarRecords { calendar, records });
    }

    Ok(RecordSnapshot {
        fetched_at: Utc::now(),
        range,
        calendars: entries,
    })
}

fn select_calendars(
    calendars: Vec<Calendar>,
    config: &CalstatConfig,
    calendar_filter: Option<&str>,
) -> Result<Vec<Calendar>> {
    match calendar_filter {
        Some(wanted) => match calendars.iter().find(|c| calendar_matches(c, wanted)) {
            Some(calendar) => Ok(vec![calendar.clone()]),
            None => {
                let available: Vec<_> = calendars.iter().map(|c| c.name.as_str()).collect();
                anyhow::bail!(
                    "Calendar '{}' not found. Available: {}",
                    wanted,
                    available.join(", ")
                );
            }
        },
        None => Ok(calendars
            .into_iter()
            .filter(|c| config.includes_calendar(&c.id))
            .collect()),
    }
}
