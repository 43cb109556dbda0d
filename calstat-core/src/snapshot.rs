//! JSON snapshots of fetched records and generated reports.
//!
//! Record snapshots keep the provider's raw JSON untouched, so an offline
//! run goes through the same [`Event::from_record`](crate::event::Event::from_record)
//! path as a live fetch.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar::Calendar;
use crate::date_range::DateRange;
use crate::error::{CalstatError, CalstatResult};
use crate::event_list::EventList;
use crate::report::{Report, ReportRow};

/// Raw records of one calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRecords {
    pub calendar: Calendar,
    pub records: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub range: DateRange,
    pub calendars: Vec<CalendarRecords>,
}

impl RecordSnapshot {
    pub fn load(path: &Path) -> CalstatResult<Self> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> CalstatResult<()> {
        write_json(path, self)
    }

    pub fn record_count(&self) -> usize {
        self.calendars.iter().map(|c| c.records.len()).sum()
    }

    /// Merge every calendar's events, in calendar order.
    ///
    /// Malformed records are dropped; the number dropped is returned alongside.
    pub fn events(&self) -> (EventList, usize) {
        self.calendars
            .iter()
            .fold((EventList::default(), 0), |(events, skipped), entry| {
                let (parsed, errors) = EventList::from_records(&entry.records, &entry.calendar);
                (events + parsed, skipped + errors.len())
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub generated_at: DateTime<Utc>,
    pub total_minutes: i64,
    pub rows: Vec<ReportRow>,
}

impl ReportSnapshot {
    pub fn new(report: &Report, total_minutes: i64) -> Self {
        ReportSnapshot {
            generated_at: Utc::now(),
            total_minutes,
            rows: report.rows.clone(),
        }
    }

    pub fn load(path: &Path) -> CalstatResult<Self> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> CalstatResult<()> {
        write_json(path, self)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> CalstatResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CalstatError::Snapshot(format!("Could not read {}: {e}", path.display()))
    })?;

    serde_json::from_str(&contents)
        .map_err(|e| CalstatError::Snapshot(format!("Could not parse {}: {e}", path.display())))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> CalstatResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(value)?;
    std::fs::write(path, contents)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn snapshot() -> RecordSnapshot {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        RecordSnapshot {
            fetched_at: now,
            range: DateRange::around(now, 30, 0).unwrap(),
            calendars: vec![
                CalendarRecords {
                    calendar: Calendar::new("work@example.com", Some("Work".into())),
                    records: vec![json!({
                        "id": "w1",
                        "summary": "Chess",
                        "start": { "dateTime": "2024-05-20T18:00:00+02:00" },
                        "end": { "dateTime": "2024-05-20T18:45:00+02:00" }
                    })],
                },
                CalendarRecords {
                    calendar: Calendar::new("home", None),
                    records: vec![
                        json!({
                            "id": "h1",
                            "summary": "chess!",
                            "start": { "dateTime": "2024-05-21T18:00:00+02:00" },
                            "end": { "dateTime": "2024-05-21T18:30:00+02:00" }
                        }),
                        json!({ "id": "broken" }),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_record_snapshot_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("records.json");

        let original = snapshot();
        original.save(&path).unwrap();
        let loaded = RecordSnapshot::load(&path).unwrap();

        assert_eq!(loaded, original);
        assert_eq!(loaded.record_count(), 3);
    }

    #[test]
    fn test_record_snapshot_events_merge_calendars_in_order() {
        let (events, skipped) = snapshot().events();

        assert_eq!(skipped, 1);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].calendar.name, "Work");
        assert_eq!(events[1].calendar.name, "No Name");
        assert_eq!(events.group_by_tokenized().sum_duration(), 75);
    }

    #[test]
    fn test_report_snapshot_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = Report {
            rows: vec![ReportRow { label: "Chess".into(), count: 2, total_minutes: 75 }],
        };

        let snapshot = ReportSnapshot::new(&report, 120);
        snapshot.save(&path).unwrap();

        assert_eq!(ReportSnapshot::load(&path).unwrap(), snapshot);
    }

    #[test]
    fn test_load_missing_snapshot_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecordSnapshot::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CalstatError::Snapshot(_)));
    }
}
