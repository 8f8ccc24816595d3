//! Deferred continuations on the simulation clock.
//!
//! The crash sequence needs "do this N seconds from now" without blocking
//! the tick loop: the loss notification waits out the crash feedback, and
//! the rumble burst has to stop itself. [`TickScheduler`] holds those
//! pending events, advances with the fixed timestep, and cancels cleanly
//! when the entity is torn down before a deadline elapses.

/// Handle for cancelling a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Entry<E> {
    id: TaskId,
    deadline: f64,
    event: E,
}

/// Single-threaded deferred-event queue driven by the tick clock.
#[derive(Debug)]
pub struct TickScheduler<E> {
    now: f64,
    next_id: u64,
    entries: Vec<Entry<E>>,
}

impl<E> Default for TickScheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TickScheduler<E> {
    /// An empty scheduler at clock zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Schedule `event` to fire `delay` seconds from the current clock.
    /// A non-positive delay fires on the next [`advance`](Self::advance).
    pub fn schedule(&mut self, delay: f32, event: E) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline: self.now + f64::from(delay.max(0.0)),
            event,
        });
        id
    }

    /// Advance the clock by `dt` and drain every event whose deadline has
    /// passed, in scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<E> {
        self.now += f64::from(dt);
        let now = self.now;

        let mut fired = Vec::new();
        let mut index = 0;
        while index < self.entries.len() {
            if self.entries[index].deadline <= now {
                fired.push(self.entries.remove(index).event);
            } else {
                index += 1;
            }
        }
        fired
    }

    /// Cancel one pending event. Returns `false` if it already fired or
    /// was never scheduled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Drop every pending event; called on entity teardown so nothing
    /// fires against stale state.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Number of events still pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Seconds of simulated time the scheduler has observed.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }
}
