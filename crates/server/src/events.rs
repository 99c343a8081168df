use crate::types::{EventCursor, ServerEvent};
use sim_core::Tick;
use std::collections::VecDeque;

/// A bounded event log with cursor-based retrieval.
///
/// Once full, the oldest events are dropped; readers that fall behind resume
/// from the oldest event still retained.
pub struct EventBuffer<E> {
    events: VecDeque<ServerEvent<E>>,
    capacity: usize,
    next_sequence: u64,
}

impl<E: Clone> EventBuffer<E> {
    /// Create a new event buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            next_sequence: 0,
        }
    }

    /// Push a new event into the buffer.
    pub fn push(&mut self, tick: Tick, event: E) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(ServerEvent {
            sequence: self.next_sequence,
            tick,
            event,
        });
        self.next_sequence += 1;
    }

    /// Push every event produced by one tick.
    pub fn extend(&mut self, tick: Tick, events: impl IntoIterator<Item = E>) {
        for event in events {
            self.push(tick, event);
        }
    }

    /// Get events starting from the given cursor.
    /// Returns the events and a new cursor pointing past the last returned event.
    pub fn get_from_cursor(&self, cursor: EventCursor) -> (Vec<ServerEvent<E>>, EventCursor) {
        let events = self
            .events
            .iter()
            .filter(|e| e.sequence >= cursor.0)
            .cloned()
            .collect();
        (events, EventCursor(self.next_sequence))
    }

    /// Get the current sequence number (next cursor position).
    pub fn current_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
