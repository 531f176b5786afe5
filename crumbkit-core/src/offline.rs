//! Mobile offline cache of evicted breadcrumbs.
//!
//! Events pushed out of the main queue on the mobile platform land here and
//! wait for the host to drain and upload them. The cache has its own capacity
//! and drops its oldest entry when full; it is not persisted.

use std::collections::VecDeque;

use crate::config::DEFAULT_OFFLINE_CAPACITY;
use crate::event::Event;

/// Capacity-bounded FIFO that overwrites its oldest entry.
#[derive(Debug, Clone)]
pub struct OfflineQueue {
    events: VecDeque<Event>,
    capacity: usize,
    dropped: u64,
}

impl OfflineQueue {
    /// Creates an empty queue.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);

        Self {
            events: VecDeque::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Appends `event`, dropping the oldest entry if the queue is full.
    pub fn push_overwrite(&mut self, event: Event) {
        if self.events.len() >= self.capacity {
            let _ = self.events.pop_front();
            self.dropped += 1;
            log::debug!(
                "offline breadcrumb queue full ({}), dropped oldest entry",
                self.capacity
            );
        }
        self.events.push_back(event);
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total entries dropped for lack of space.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for OfflineQueue {
    fn default() -> Self {
        Self::new(DEFAULT_OFFLINE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_at_capacity_dropping_oldest() {
        let mut queue = OfflineQueue::default();
        for i in 0..105 {
            queue.push_overwrite(Event::click(format!("b{i}"), i));
        }

        assert_eq!(queue.len(), 100);
        assert_eq!(queue.dropped(), 5);

        let drained = queue.drain();
        assert_eq!(drained.first(), Some(&Event::click("b5", 5)));
        assert_eq!(drained.last(), Some(&Event::click("b104", 104)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut queue = OfflineQueue::new(usize::MAX);
        queue.push_overwrite(Event::click("a", 1));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dropped(), 0);
    }

    #[test]
    fn test_drain_keeps_order() {
        let mut queue = OfflineQueue::new(3);
        queue.push_overwrite(Event::navigation("/a", 2));
        queue.push_overwrite(Event::navigation("/b", 1));
        assert_eq!(
            queue.drain(),
            vec![Event::navigation("/a", 2), Event::navigation("/b", 1)]
        );
        assert!(queue.drain().is_empty());
    }
}
