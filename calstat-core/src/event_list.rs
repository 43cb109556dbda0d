//! Ordered event collections.

use std::hash::Hash;
use std::ops::{Add, Index};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::calendar::Calendar;
use crate::date_range::DateRange;
use crate::error::MalformedRecordError;
use crate::event::Event;
use crate::event_group::EventGroup;

/// An ordered list of events.
///
/// Every transformation returns a new list; the receiver is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventList {
    events: Vec<Event>,
}

impl EventList {
    pub fn new(events: Vec<Event>) -> Self {
        EventList { events }
    }

    /// Build events from raw provider records, collecting malformed ones
    /// instead of failing the whole batch.
    pub fn from_records<'a, I>(records: I, calendar: &Calendar) -> (Self, Vec<MalformedRecordError>)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut events = Vec::new();
        let mut errors = Vec::new();

        for record in records {
            match Event::from_record(record, calendar) {
                Ok(event) => events.push(event),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            warn!(
                calendar = %calendar.id,
                skipped = errors.len(),
                "Skipped malformed event records"
            );
        }

        (EventList { events }, errors)
    }

    pub fn filter<F>(&self, condition: F) -> EventList
    where
        F: Fn(&Event) -> bool,
    {
        self.events.iter().filter(|&e| condition(e)).cloned().collect()
    }

    /// Events whose summary contains `query`, ignoring case.
    pub fn matching(&self, query: &str) -> EventList {
        let query = query.to_lowercase();
        self.filter(|e| e.summary.to_lowercase().contains(&query))
    }

    /// Events starting inside `range`.
    pub fn within(&self, range: &DateRange) -> EventList {
        self.filter(|e| range.contains(&e.start.to_utc()))
    }

    /// Chronological copy (stable for events starting at the same instant).
    pub fn sorted_by_start(&self) -> EventList {
        let mut events = self.events.clone();
        events.sort_by_key(|e| e.start.to_utc());
        EventList { events }
    }

    /// Partition events by `key`.
    ///
    /// Groups come back ordered by size, largest first. Groups of equal size
    /// keep the order in which their key was first seen.
    pub fn group_by<K, F>(&self, key: F) -> EventGroup<K>
    where
        K: Eq + Hash,
        F: Fn(&Event) -> K,
    {
        let groups: EventGroup<K> = self
            .events
            .iter()
            .map(|event| (key(event), EventList::new(vec![event.clone()])))
            .collect();

        groups.sort_by(|group| group.len())
    }

    pub fn group_by_summary(&self) -> EventGroup<String> {
        self.group_by(|event| event.summary.clone())
    }

    /// Group by tokenized summary, labelling each group with the summary of
    /// its first event.
    pub fn group_by_tokenized(&self) -> EventGroup<String> {
        self.group_by(Event::tokenized).map_keys(|group| {
            group
                .first()
                .map(|event| event.summary.clone())
                .unwrap_or_default()
        })
    }

    /// Total duration in minutes. Zero for an empty list.
    pub fn sum_duration(&self) -> i64 {
        self.events.iter().map(Event::duration).sum()
    }

    /// This list followed by `other`.
    pub fn concat(&self, other: &EventList) -> EventList {
        self.iter().chain(other.iter()).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn first(&self) -> Option<&Event> {
        self.events.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }
}

impl Add for EventList {
    type Output = EventList;

    fn add(mut self, other: EventList) -> EventList {
        self.events.extend(other.events);
        self
    }
}

impl Index<usize> for EventList {
    type Output = Event;

    fn index(&self, index: usize) -> &Event {
        &self.events[index]
    }
}

impl Extend<Event> for EventList {
    fn extend<T: IntoIterator<Item = Event>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

impl FromIterator<Event> for EventList {
    fn from_iter<T: IntoIterator<Item = Event>>(iter: T) -> Self {
        EventList {
            events: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for EventList {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a EventList {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
