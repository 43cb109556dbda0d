//! Named groups of events.

use std::cmp::Reverse;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;

use crate::event_list::EventList;

/// An ordered mapping from a group key to the events in that group.
///
/// Produced by [`EventList::group_by`]. Operations consume the group and
/// return a new one, so they chain:
/// `events.group_by_tokenized().filter(|g| g.len() > 5).sort_by(EventList::sum_duration)`.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct EventGroup<K: Eq + Hash> {
    groups: IndexMap<K, EventList>,
}

impl<K: Eq + Hash> EventGroup<K> {
    pub fn new() -> Self {
        EventGroup {
            groups: IndexMap::new(),
        }
    }

    /// Reorder groups by `score`, highest first. Ties keep their current order.
    pub fn sort_by<S, F>(self, score: F) -> Self
    where
        S: Ord,
        F: Fn(&EventList) -> S,
    {
        let mut entries: Vec<(K, EventList)> = self.groups.into_iter().collect();
        entries.sort_by_cached_key(|(_, group)| Reverse(score(group)));

        EventGroup {
            groups: entries.into_iter().collect(),
        }
    }

    /// Re-key every group with `key`, which sees the group's events rather
    /// than the old key.
    ///
    /// Groups that land on the same new key are merged: their events are
    /// concatenated in the current group order and the merged group takes
    /// the position of the first of them.
    pub fn map_keys<K2, F>(self, key: F) -> EventGroup<K2>
    where
        K2: Eq + Hash,
        F: Fn(&EventList) -> K2,
    {
        self.groups
            .into_values()
            .map(|group| (key(&group), group))
            .collect()
    }

    /// Keep only the groups satisfying `condition`.
    pub fn filter<F>(self, condition: F) -> Self
    where
        F: Fn(&EventList) -> bool,
    {
        EventGroup {
            groups: self
                .groups
                .into_iter()
                .filter(|(_, group)| condition(group))
                .collect(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&EventList> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, K, EventList> {
        self.groups.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, K, EventList> {
        self.groups.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, K, EventList> {
        self.groups.values()
    }

    /// Total duration across every group, in minutes.
    pub fn sum_duration(&self) -> i64 {
        self.groups.values().map(EventList::sum_duration).sum()
    }
}

impl<K: Eq + Hash> Default for EventGroup<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Collecting merges entries that share a key.
impl<K: Eq + Hash> FromIterator<(K, EventList)> for EventGroup<K> {
    fn from_iter<T: IntoIterator<Item = (K, EventList)>>(iter: T) -> Self {
        let mut groups: IndexMap<K, EventList> = IndexMap::new();
        for (key, events) in iter {
            groups.entry(key).or_default().extend(events);
        }
        EventGroup { groups }
    }
}

impl<K: Eq + Hash> IntoIterator for EventGroup<K> {
    type Item = (K, EventList);
    type IntoIter = indexmap::map::IntoIter<K, EventList>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a, K: Eq + Hash> IntoIterator for &'a EventGroup<K> {
    type Item = (&'a K, &'a EventList);
    type IntoIter = indexmap::map::Iter<'a, K, EventList>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::event::tests::make_event;
    use chrono::{Duration, TimeZone, Utc};

    fn events() -> EventList {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        EventList::new(vec![
            make_event("1", "Reading", t, 120),
            make_event("2", "Gym", t + Duration::days(1), 60),
            make_event("3", "Gym", t + Duration::days(2), 60),
            make_event("4", "Piano", t + Duration::days(3), 30),
            make_event("5", "Piano", t + Duration::days(4), 30),
            make_event("6", "Piano", t + Duration::days(5), 30),
            make_event("7", "Nap", t + Duration::days(6), 20),
        ])
    }

    fn keys(group: &EventGroup<String>) -> Vec<&str> {
        group.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_sort_by_is_non_increasing() {
        let grouped = events().group_by_summary().sort_by(EventList::sum_duration);
        let scores: Vec<i64> = grouped.values().map(EventList::sum_duration).collect();

        assert_eq!(scores, vec![120, 120, 90, 20]);
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_sort_by_keeps_ties_in_prior_order() {
        let grouped = events().group_by_summary();
        // Size order first: Piano(3), Gym(2), Reading(1), Nap(1)
        assert_eq!(keys(&grouped), vec!["Piano", "Gym", "Reading", "Nap"]);

        // Gym and Reading tie at 120 minutes, Gym was ahead before sorting
        let by_duration = grouped.sort_by(EventList::sum_duration);
        assert_eq!(keys(&by_duration), vec!["Gym", "Reading", "Piano", "Nap"]);
    }

    #[test]
    fn test_filter_keeps_order() {
        let frequent = events().group_by_summary().filter(|g| g.len() >= 2);
        assert_eq!(keys(&frequent), vec!["Piano", "Gym"]);
    }

    #[test]
    fn test_filter_without_matches_is_empty() {
        let frequent = events().group_by_summary().filter(|g| g.len() > 5);
        assert!(frequent.is_empty());
        assert_eq!(frequent.sum_duration(), 0);
    }

    #[test]
    fn test_map_keys_relabels_from_group_contents() {
        let relabelled = events()
            .group_by_summary()
            .map_keys(|g| format!("{} x{}", g[0].summary, g.len()));

        assert_eq!(keys(&relabelled), vec!["Piano x3", "Gym x2", "Reading x1", "Nap x1"]);
    }

    #[test]
    fn test_map_keys_merges_colliding_groups() {
        let source = events();
        let grouped = source.group_by_summary();
        let before = grouped.sum_duration();

        // Every group with fewer than three events collapses into "short"
        let merged = grouped.map_keys(|g| {
            if g.len() >= 3 { "long".to_string() } else { "short".to_string() }
        });

        assert_eq!(keys(&merged), vec!["long", "short"]);
        let short: Vec<&str> = merged
            .get(&"short".to_string())
            .unwrap()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(short, vec!["2", "3", "1", "7"]);
        assert_eq!(merged.sum_duration(), before);
        assert_eq!(merged.values().map(EventList::len).sum::<usize>(), source.len());
    }

    #[test]
    fn test_group_by_arbitrary_key() {
        let by_length = events().group_by(|e: &Event| e.duration() >= 60);

        assert_eq!(by_length.get(&true).unwrap().len(), 3);
        assert_eq!(by_length.get(&false).unwrap().len(), 4);
        // Larger group first
        assert_eq!(by_length.keys().copied().collect::<Vec<_>>(), vec![false, true]);
    }
}
