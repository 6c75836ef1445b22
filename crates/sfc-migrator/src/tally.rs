//! Event names seen across a migration run.

use std::collections::BTreeMap;

/// Every event name encountered in view event maps, with occurrence counts.
///
/// Purely informational. Tallies from separate components are combined with
/// [`EventTally::merge`], so components can be migrated independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTally {
    events: BTreeMap<String, usize>,
}

impl EventTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of an event name.
    pub fn record(&mut self, event_name: &str) {
        *self.events.entry(event_name.to_string()).or_insert(0) += 1;
    }

    /// Add another tally into this one.
    pub fn merge(&mut self, other: &EventTally) {
        for (name, count) in &other.events {
            *self.events.entry(name.clone()).or_insert(0) += count;
        }
    }

    /// Event names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// Event names with their counts, in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.events.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Occurrences of one event name.
    pub fn count(&self, event_name: &str) -> usize {
        self.events.get(event_name).copied().unwrap_or(0)
    }

    /// Check if an event name was seen.
    pub fn contains(&self, event_name: &str) -> bool {
        self.events.contains_key(event_name)
    }

    /// Number of distinct event names.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
