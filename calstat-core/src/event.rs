//! The calendar event model.
//!
//! Events are built once from raw provider records (Google Calendar JSON) and
//! never mutated afterwards. Everything the grouping engine needs, such as the
//! duration and the tokenized summary, is derived on demand.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar::Calendar;
use crate::error::MalformedRecordError;
use crate::tokenize::tokenize;

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// Lifecycle state as reported by the provider ("confirmed", "cancelled", ...)
    pub status: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub creator: Option<Person>,
    pub organizer: Option<Person>,
    pub start: EventTime,
    pub end: EventTime,
    pub created: String,
    pub updated: String,
    /// Calendar this event was fetched from
    pub calendar: Calendar,
}

/// Creator or organizer of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "self", default)]
    pub is_self: Option<bool>,
}

/// Start or end of an event: a whole day, or an instant with its original UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl EventTime {
    /// Uniform timestamp. All-day values normalize to midnight at offset +00:00.
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        match self {
            EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset(),
            EventTime::DateTime(dt) => *dt,
        }
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.timestamp().with_timezone(&Utc)
    }

    /// Calendar date in the event's own offset.
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Date(d) => *d,
            EventTime::DateTime(dt) => dt.date_naive(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Parse a Google-style time object: `{"dateTime": "..."}` or `{"date": "YYYY-MM-DD"}`.
    /// `dateTime` wins when both are present.
    fn from_record(field: &'static str, raw: &Value) -> Result<Self, MalformedRecordError> {
        let date_time = raw.get("dateTime").and_then(Value::as_str);
        let date = raw.get("date").and_then(Value::as_str);

        match (date_time, date) {
            (Some(s), _) => parse_date_time(s)
                .map(EventTime::DateTime)
                .ok_or_else(|| MalformedRecordError::InvalidTime {
                    field,
                    value: s.to_string(),
                }),
            (None, Some(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(EventTime::Date)
                .map_err(|_| MalformedRecordError::InvalidTime {
                    field,
                    value: s.to_string(),
                }),
            (None, None) => Err(MalformedRecordError::MissingField(field)),
        }
    }
}

/// RFC 3339 first; an offset-less timestamp is read as UTC.
fn parse_date_time(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok().or_else(|| {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(|dt| dt.and_utc().fixed_offset())
    })
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M %:z")),
        }
    }
}

impl Event {
    /// Build an event from a raw provider record.
    ///
    /// `id`, `summary`, `start` and `end` are required. `description` and
    /// `location` default to an empty string; `status`, `created` and `updated`
    /// pass through as-is (empty when absent).
    pub fn from_record(raw: &Value, calendar: &Calendar) -> Result<Self, MalformedRecordError> {
        let record = raw.as_object().ok_or(MalformedRecordError::NotAnObject)?;

        let required_str = |field: &'static str| -> Result<String, MalformedRecordError> {
            record
                .get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(MalformedRecordError::MissingField(field))
        };
        let optional_str = |field: &str| -> String {
            record
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let person = |field: &str| -> Option<Person> {
            record
                .get(field)
                .and_then(|v| serde_json::from_value(v.clone()).ok())
        };
        let time = |field: &'static str| -> Result<EventTime, MalformedRecordError> {
            let raw_time = record
                .get(field)
                .ok_or(MalformedRecordError::MissingField(field))?;
            EventTime::from_record(field, raw_time)
        };

        Ok(Event {
            id: required_str("id")?,
            status: optional_str("status"),
            summary: required_str("summary")?,
            description: optional_str("description"),
            location: optional_str("location"),
            creator: person("creator"),
            organizer: person("organizer"),
            start: time("start")?,
            end: time("end")?,
            created: optional_str("created"),
            updated: optional_str("updated"),
            calendar: calendar.clone(),
        })
    }

    /// Whole minutes between start and end (floor of elapsed seconds / 60).
    ///
    /// Uses the total elapsed time, so multi-day events count in full.
    /// Negative when `end` precedes `start`.
    pub fn duration(&self) -> i64 {
        let elapsed = self.end.timestamp() - self.start.timestamp();
        elapsed.num_seconds().div_euclid(60)
    }

    /// Canonical grouping key derived from the summary.
    pub fn tokenized(&self) -> String {
        tokenize(&self.summary)
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary)
    }
}
