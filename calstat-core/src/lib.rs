//! Core of calstat: the event model and the grouping engine.
//!
//! Raw provider records become [`Event`]s, which are collected in an
//! [`EventList`], partitioned into an [`EventGroup`] and summarized as a
//! [`Report`]:
//!
//! ```
//! use calstat_core::{EventList, frequent_by_duration};
//!
//! let events = EventList::default();
//! let ranked = frequent_by_duration(&events, 5);
//! assert!(ranked.report().is_empty());
//! ```

pub mod calendar;
pub mod categories;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod event_group;
pub mod event_list;
pub mod palette;
pub mod report;
pub mod snapshot;
pub mod tokenize;

pub use calendar::Calendar;
pub use date_range::DateRange;
pub use error::{CalstatError, CalstatResult, MalformedRecordError};
pub use event::{Event, EventTime, Person};
pub use event_group::EventGroup;
pub use event_list::EventList;
pub use report::{Report, ReportOptions, ReportRow, build_report, frequent_by_duration};
