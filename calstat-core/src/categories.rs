//! Keyword categories.
//!
//! A category matches an event when any of its keywords occurs in the event
//! summary. Categories may overlap, so the result is a [`Report`] rather than
//! an [`EventGroup`](crate::event_group::EventGroup), which always partitions.

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::event_list::EventList;
use crate::report::{Report, ReportRow};

/// Label of the catch-all row appended to every category report.
pub const OTHERS: &str = "Others";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Category {
    pub fn matches(&self, event: &Event) -> bool {
        if self.case_sensitive {
            self.keywords.iter().any(|k| event.summary.contains(k.as_str()))
        } else {
            let summary = event.summary.to_lowercase();
            self.keywords
                .iter()
                .any(|k| summary.contains(&k.to_lowercase()))
        }
    }
}

/// One row per category in the given order, followed by an [`OTHERS`] row
/// covering every event.
pub fn category_report(events: &EventList, categories: &[Category]) -> Report {
    let mut rows: Vec<ReportRow> = categories
        .iter()
        .map(|category| ReportRow::from_events(&category.name, &events.filter(|e| category.matches(e))))
        .collect();

    rows.push(ReportRow::from_events(OTHERS, events));

    Report { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::make_event;
    use chrono::{Duration, TimeZone, Utc};

    fn category(name: &str, keywords: &[&str], case_sensitive: bool) -> Category {
        Category {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            case_sensitive,
        }
    }

    fn events() -> EventList {
        let t = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        EventList::new(vec![
            make_event("1", "VL Analysis", t, 90),
            make_event("2", "ÜB Analysis", t + Duration::hours(2), 90),
            make_event("3", "Klausur Lineare Algebra", t + Duration::days(1), 120),
            make_event("4", "Daimler project sync", t + Duration::days(2), 30),
            make_event("5", "Pyro symposium prep", t + Duration::days(3), 60),
            make_event("6", "Dinner", t + Duration::days(4), 75),
        ])
    }

    #[test]
    fn test_case_sensitive_keywords() {
        let academic = category("Academic", &["BA", "ÜB", "VL", "Klausur"], true);
        let t = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();

        assert!(academic.matches(&make_event("x", "VL Analysis", t, 10)));
        assert!(!academic.matches(&make_event("y", "vl analysis", t, 10)));
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let work = category("Work", &["daimler", "PYRO"], false);
        let matched = events().filter(|e| work.matches(e));
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_category_report_allows_overlap_and_appends_others() {
        let categories = vec![
            category("Academic", &["BA", "ÜB", "VL", "Klausur"], true),
            category("Analysis", &["analysis"], false),
            category("Work", &["Daimler", "Pyro", "Symp"], false),
        ];

        let report = category_report(&events(), &categories);

        assert_eq!(
            report.rows,
            vec![
                ReportRow { label: "Academic".into(), count: 3, total_minutes: 300 },
                ReportRow { label: "Analysis".into(), count: 2, total_minutes: 180 },
                ReportRow { label: "Work".into(), count: 2, total_minutes: 90 },
                ReportRow { label: OTHERS.into(), count: 6, total_minutes: 465 },
            ]
        );
    }

    #[test]
    fn test_category_report_without_categories() {
        let report = category_report(&EventList::default(), &[]);
        assert_eq!(report.rows, vec![ReportRow { label: OTHERS.into(), count: 0, total_minutes: 0 }]);
    }
}
