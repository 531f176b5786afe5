//! Bounded FIFO of breadcrumb events.
//!
//! After every mutation the queue holds at most `max_events` events and its
//! serialized form is at most `max_bytes` bytes. The one exception is a lone
//! event that is oversized on its own: it is kept rather than rejected.

use std::collections::VecDeque;

use crate::event::Event;

/// Default count ceiling.
pub const DEFAULT_MAX_EVENTS: usize = 20;

/// Default serialized-size ceiling in bytes (5 KiB).
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024;

/// Upper bound on the slots reserved up front; larger queues grow on demand.
const PREALLOCATED_EVENTS: usize = 64;

/// Ordered, bounded collection of events with oldest-first eviction.
#[derive(Debug, Clone)]
pub struct EventQueue {
    events: VecDeque<Event>,
    max_events: usize,
    max_bytes: usize,
}

impl EventQueue {
    /// Creates an empty queue with the given ceilings.
    ///
    /// # Panics
    ///
    /// Panics if `max_events` is zero; configuration is validated before a
    /// queue is built.
    #[must_use]
    pub fn new(max_events: usize, max_bytes: usize) -> Self {
        assert!(max_events > 0);

        Self {
            events: VecDeque::with_capacity(max_events.min(PREALLOCATED_EVENTS) + 1),
            max_events,
            max_bytes,
        }
    }

    /// Appends `event`, then evicts from the head until both ceilings hold.
    ///
    /// Count eviction runs to completion before size eviction starts. Size
    /// eviction never removes the last remaining event.
    ///
    /// Returns the evicted events, oldest first.
    pub fn admit(&mut self, event: Event) -> Vec<Event> {
        self.events.push_back(event);

        let mut evicted = Vec::new();
        while self.events.len() > self.max_events {
            evicted.extend(self.events.pop_front());
        }
        while self.events.len() > 1 && self.size_bytes() > self.max_bytes {
            evicted.extend(self.events.pop_front());
        }
        evicted
    }

    /// Admits `events` one by one, in order.
    ///
    /// Used to seed the queue from storage; a record written under larger
    /// ceilings is trimmed to the current ones.
    pub fn seed(&mut self, events: impl IntoIterator<Item = Event>) -> Vec<Event> {
        events
            .into_iter()
            .flat_map(|event| self.admit(event))
            .collect()
    }

    /// Copy of the events sorted by timestamp, ties in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<Event> {
        let mut events = self.snapshot();
        events.sort_by_key(|event| event.timestamp);
        events
    }

    /// Copy of the events in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.iter().cloned().collect()
    }

    /// Removes every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of events held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the queue holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// UTF-8 length of the compact JSON array of all events.
    fn size_bytes(&self) -> usize {
        serialized_len(&self.events)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EVENTS, DEFAULT_MAX_BYTES)
    }
}

/// Byte length of `events` serialized as one JSON array.
///
/// The array brackets and separators count, so this is larger than the sum of
/// the individually serialized events.
#[must_use]
pub fn serialized_len<'a, I>(events: I) -> usize
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut counter = ByteCounter(0);
    let events: Vec<&Event> = events.into_iter().collect();
    // Serializing plain structs of strings and integers cannot fail.
    match serde_json::to_writer(&mut counter, &events) {
        Ok(()) => counter.0,
        Err(_) => usize::MAX,
    }
}

struct ByteCounter(usize);

impl std::io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
