//! Impact history: append-only, ordered by time
//!
//! The store does no filtering of its own. Every risk recompute sums over
//! the full history; decay makes old impacts negligible without dropping
//! them.

use alloc::vec::Vec;

use crate::impact::ImpactEvent;

/// Ordered log of detected impacts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactHistoryStore {
    events: Vec<ImpactEvent>,
}

impl ImpactHistoryStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Builds a store from persisted events, restoring time order
    pub fn from_events(mut events: Vec<ImpactEvent>) -> Self {
        events.sort_by_key(|e| e.time);
        Self { events }
    }

    /// Appends an event, keeping the log ordered by time
    pub fn append(&mut self, event: ImpactEvent) {
        match self.events.last() {
            Some(last) if event.time < last.time => {
                let pos = self.events.partition_point(|e| e.time <= event.time);
                self.events.insert(pos, event);
            }
            _ => self.events.push(event),
        }
    }

    pub fn all(&self) -> &[ImpactEvent] {
        &self.events
    }

    pub fn latest(&self) -> Option<&ImpactEvent> {
        self.events.last()
    }

    pub(crate) fn latest_mut(&mut self) -> Option<&mut ImpactEvent> {
        self.events.last_mut()
    }

    /// Removes every event; the only form of deletion
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(time: u64, severity: f64) -> ImpactEvent {
        ImpactEvent::new(time, 2.0, 500.0, severity)
    }

    #[test]
    fn append_and_read_back() {
        let mut store = ImpactHistoryStore::new();
        assert!(store.is_empty());
        store.append(event(10, 0.5));
        store.append(event(20, 0.7));
        assert_eq!(store.len(), 2);
        assert_eq!(store.latest().map(|e| e.severity), Some(0.7));
    }

    #[test]
    fn out_of_order_append_is_placed_by_time() {
        let mut store = ImpactHistoryStore::new();
        store.append(event(10, 0.1));
        store.append(event(30, 0.3));
        store.append(event(20, 0.2));
        let times: Vec<u64> = store.all().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![10, 20, 30]);
    }

    #[test]
    fn from_events_sorts() {
        let store = ImpactHistoryStore::from_events(vec![event(3, 0.0), event(1, 0.0), event(2, 0.0)]);
        let times: Vec<u64> = store.all().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![1, 2, 3]);
    }

    #[test]
    fn clear_empties() {
        let mut store = ImpactHistoryStore::from_events(vec![event(1, 0.4)]);
        store.clear();
        assert!(store.is_empty());
        assert!(store.latest().is_none());
    }
}
