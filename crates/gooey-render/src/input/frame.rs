use std::collections::VecDeque;

use super::types::Event;

/// Events a window keeps between resets. Older ones are dropped first.
pub const EVENT_CAPACITY: usize = 64;

/// Recent events received by one window since the last reset, in arrival
/// order. Bounded, so a caller that never resets does not grow it.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn push(&mut self, event: Event) {
        if self.events.len() == EVENT_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Most recent event (`GetEvents`).
    pub fn latest(&self) -> Option<&Event> {
        self.events.back()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Forgets all events (`ResetEvents`).
    pub fn reset(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
