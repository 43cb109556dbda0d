//! Colored terminal rendering for calstat types.

use calstat_core::palette::{Color, Palette};
use calstat_core::{Calendar, Event, EventTime, Report};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Calendar {
    fn render(&self) -> String {
        format!("📅 {}", self.name)
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let minutes = format!("({})", format_minutes(self.duration()));
        format!("{} {} {}", format_time(&self.start), self.summary, minutes.dimmed())
    }
}

pub fn paint(text: &str, color: Color) -> String {
    text.truecolor(color.r, color.g, color.b).to_string()
}

/// Rows as `duration  count  label`, labels colored from the palette.
pub fn render_report(report: &Report, palette: &Palette) -> Vec<String> {
    let colors = palette.assign(report.labels());

    report
        .rows
        .iter()
        .map(|row| {
            let label = match colors.get(row.label.as_str()) {
                Some(&color) => paint(&row.label, color),
                None => row.label.clone(),
            };
            format!(
                "{:>10}  {:>5}  {}",
                format_minutes(row.total_minutes),
                format!("{}x", row.count).dimmed(),
                label
            )
        })
        .collect()
}

/// Minutes as hours and minutes, e.g. `2h 15m`.
pub fn format_minutes(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.unsigned_abs();

    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{sign}{m}m"),
        (h, 0) => format!("{sign}{h}h"),
        (h, m) => format!("{sign}{h}h {m}m"),
    }
}

/// Time of day in the event's own offset, or `all-day`.
pub fn format_time(time: &EventTime) -> String {
    match time {
        EventTime::Date(_) => format!("{:>7}", "all-day"),
        EventTime::DateTime(dt) => format!("{:>7}", dt.format("%H:%M")),
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calstat_core::ReportRow;
    use chrono::{DateTime, NaiveDate};

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(75), "1h 15m");
        assert_eq!(format_minutes(1500), "25h");
        assert_eq!(format_minutes(-30), "-30m");
    }

    #[test]
    fn test_format_time() {
        let date = EventTime::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(format_time(&date), "all-day");

        let dt = DateTime::parse_from_rfc3339("2024-03-01T09:05:00+01:00").unwrap();
        assert_eq!(format_time(&EventTime::DateTime(dt)), "  09:05");
    }

    #[test]
    fn test_render_report_keeps_row_order() {
        let report = Report {
            rows: vec![
                ReportRow {
                    label: "Chess".into(),
                    count: 6,
                    total_minutes: 300,
                },
                ReportRow {
                    label: "Gym".into(),
                    count: 8,
                    total_minutes: 240,
                },
            ],
        };

        let lines = render_report(&report, &Palette::default());

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("5h") && lines[0].contains("Chess"));
        assert!(lines[1].contains("4h") && lines[1].contains("Gym"));
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 2), "events");
    }
}
