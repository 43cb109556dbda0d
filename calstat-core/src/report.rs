//! Aggregated, ranked summaries of event groups.

use std::fmt::Display;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::event_group::EventGroup;
use crate::event_list::EventList;

/// Aggregate of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub label: String,
    pub count: usize,
    pub total_minutes: i64,
}

impl ReportRow {
    pub fn from_events(label: impl Into<String>, events: &EventList) -> Self {
        ReportRow {
            label: label.into(),
            count: events.len(),
            total_minutes: events.sum_duration(),
        }
    }
}

/// Ranked rows, in presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn total_minutes(&self) -> i64 {
        self.rows.iter().map(|r| r.total_minutes).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.label.as_str())
    }
}

impl<K: Eq + Hash + Display> EventGroup<K> {
    /// One row per group, keeping the group order.
    pub fn report(&self) -> Report {
        Report {
            rows: self
                .iter()
                .map(|(key, events)| ReportRow::from_events(key.to_string(), events))
                .collect(),
        }
    }
}

/// Ordering of report rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBy {
    /// Total minutes, highest first
    #[default]
    Duration,
    /// Number of events, highest first
    Count,
}

/// How events are bucketed before ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// Order-, case- and punctuation-insensitive titles
    #[default]
    Tokenized,
    /// Exact titles
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Only groups with strictly more events than this are kept
    pub min_occurrences: usize,
    pub rank_by: RankBy,
    pub grouping: Grouping,
    pub limit: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            min_occurrences: 5,
            rank_by: RankBy::Duration,
            grouping: Grouping::Tokenized,
            limit: None,
        }
    }
}

/// Groups occurring more than `min_occurrences` times, ranked by total duration.
pub fn frequent_by_duration(events: &EventList, min_occurrences: usize) -> EventGroup<String> {
    events
        .group_by_tokenized()
        .filter(|group| group.len() > min_occurrences)
        .sort_by(EventList::sum_duration)
}

pub fn build_report(events: &EventList, options: &ReportOptions) -> Report {
    let grouped = match options.grouping {
        Grouping::Tokenized => events.group_by_tokenized(),
        Grouping::Summary => events.group_by_summary(),
    };

    let frequent = grouped.filter(|group| group.len() > options.min_occurrences);

    let ranked = match options.rank_by {
        RankBy::Duration => frequent.sort_by(EventList::sum_duration),
        RankBy::Count => frequent.sort_by(EventList::len),
    };

    let mut report = ranked.report();
    if let Some(limit) = options.limit {
        report.rows.truncate(limit);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::make_event;
    use chrono::{Duration, TimeZone, Utc};

    /// `n` occurrences of `summary`, each `minutes` long, one per day.
    fn repeated(summary: &str, n: usize, minutes: i64) -> Vec<crate::event::Event> {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap();
        (0..n)
            .map(|i| make_event(&format!("{summary}-{i}"), summary, t + Duration::days(i as i64), minutes))
            .collect()
    }

    fn sample() -> EventList {
        let mut events = Vec::new();
        events.extend(repeated("Chess", 4, 60));
        events.extend(repeated("chess!", 3, 30));
        events.extend(repeated("Standup", 10, 15));
        events.extend(repeated("Gym", 6, 45));
        events.extend(repeated("Dentist", 1, 90));
        EventList::new(events)
    }

    #[test]
    fn test_frequent_by_duration() {
        let ranked = frequent_by_duration(&sample(), 5);
        let report = ranked.report();

        assert_eq!(
            report.rows,
            vec![
                ReportRow { label: "Chess".into(), count: 7, total_minutes: 330 },
                ReportRow { label: "Gym".into(), count: 6, total_minutes: 270 },
                ReportRow { label: "Standup".into(), count: 10, total_minutes: 150 },
            ]
        );
    }

    #[test]
    fn test_build_report_rank_by_count_with_limit() {
        let options = ReportOptions {
            min_occurrences: 0,
            rank_by: RankBy::Count,
            limit: Some(2),
            ..Default::default()
        };
        let report = build_report(&sample(), &options);

        assert_eq!(report.labels().collect::<Vec<_>>(), vec!["Standup", "Chess"]);
    }

    #[test]
    fn test_build_report_by_exact_summary() {
        let options = ReportOptions {
            min_occurrences: 2,
            grouping: Grouping::Summary,
            ..Default::default()
        };
        let report = build_report(&sample(), &options);

        assert_eq!(
            report.labels().collect::<Vec<_>>(),
            vec!["Gym", "Chess", "Standup", "chess!"]
        );
        assert_eq!(report.total_minutes(), 270 + 240 + 150 + 90);
    }

    #[test]
    fn test_build_report_without_frequent_groups_is_empty() {
        let report = build_report(&sample(), &ReportOptions { min_occurrences: 50, ..Default::default() });
        assert!(report.is_empty());
        assert_eq!(report.total_minutes(), 0);
    }

    #[test]
    fn test_report_on_empty_events() {
        let report = build_report(&EventList::default(), &ReportOptions::default());
        assert_eq!(report, Report::default());
    }
}
