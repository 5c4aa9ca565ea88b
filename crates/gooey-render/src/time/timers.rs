use std::time::{Duration, Instant};

use slotmap::SlotMap;

use crate::error::BackendError;

slotmap::new_key_type! {
    /// Generational handle to a backend timer.
    pub struct TimerId;
}

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct TimerSlot<C> {
    interval: Duration,
    next_due: Option<Instant>,
    callback: Option<C>,
}

/// Periodic timers polled by a backend's run loop.
///
/// A timer fires every `interval` until stopped or destroyed. Callbacks are
/// lent out by [`take_due`](Self::take_due) and handed back with
/// [`restore`](Self::restore), so a callback may freely create, stop or destroy
/// timers (itself included) while it runs.
#[derive(Debug)]
pub struct Timers<C> {
    slots: SlotMap<TimerId, TimerSlot<C>>,
}

impl<C> Default for Timers<C> {
    fn default() -> Self {
        Self { slots: SlotMap::with_key() }
    }
}

impl<C> Timers<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle timer with no callback.
    pub fn create(&mut self) -> TimerId {
        self.slots.insert(TimerSlot {
            interval: MIN_INTERVAL,
            next_due: None,
            callback: None,
        })
    }

    /// Installs `callback` and (re)starts the timer with the given period.
    pub fn set_callback(
        &mut self,
        id: TimerId,
        interval: Duration,
        callback: C,
        now: Instant,
    ) -> Result<(), BackendError> {
        let slot = self.slots.get_mut(id).ok_or(BackendError::UnknownTimer(id))?;
        slot.interval = interval.max(MIN_INTERVAL);
        slot.next_due = Some(now + slot.interval);
        slot.callback = Some(callback);
        Ok(())
    }

    /// Stops a timer; its callback is kept until destroyed or replaced.
    pub fn stop(&mut self, id: TimerId) -> Result<(), BackendError> {
        let slot = self.slots.get_mut(id).ok_or(BackendError::UnknownTimer(id))?;
        slot.next_due = None;
        Ok(())
    }

    pub fn destroy(&mut self, id: TimerId) -> Result<(), BackendError> {
        self.slots
            .remove(id)
            .map(drop)
            .ok_or(BackendError::UnknownTimer(id))
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.slots.get(id).is_some_and(|s| s.next_due.is_some())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Earliest pending deadline across running timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.values().filter_map(|s| s.next_due).min()
    }

    /// Takes the callbacks of every timer due at `now`, in deadline order,
    /// and schedules their next firing.
    ///
    /// A timer that fell several periods behind fires once and is rescheduled
    /// relative to `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<(TimerId, C)> {
        let mut due: Vec<(Instant, TimerId)> = self
            .slots
            .iter()
            .filter_map(|(id, s)| match s.next_due {
                Some(at) if at <= now && s.callback.is_some() => Some((at, id)),
                _ => None,
            })
            .collect();
        due.sort_by_key(|(at, _)| *at);

        let mut fired = Vec::with_capacity(due.len());
        for (at, id) in due {
            let Some(slot) = self.slots.get_mut(id) else { continue };
            let mut next = at + slot.interval;
            if next <= now {
                next = now + slot.interval;
            }
            slot.next_due = Some(next);
            if let Some(cb) = slot.callback.take() {
                fired.push((id, cb));
            }
        }
        fired
    }

    /// Returns a callback lent out by [`take_due`](Self::take_due).
    ///
    /// Dropped if the timer was destroyed meanwhile or given a new callback.
    pub fn restore(&mut self, id: TimerId, callback: C) {
        if let Some(slot) = self.slots.get_mut(id) {
            if slot.callback.is_none() {
                slot.callback = Some(callback);
            }
        }
    }
}
