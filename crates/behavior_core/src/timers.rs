//! Virtual-clock timer queue and the debounce primitive built on it.

use std::collections::{BTreeMap, HashMap};

use shared::domain::TimerId;

/// Pending callbacks ordered by deadline, ties broken by scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: usize,
    pending: BTreeMap<(u64, TimerId), T>,
    deadlines: HashMap<TimerId, u64>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = now_ms.saturating_add(delay_ms);
        self.pending.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Returns the task if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.pending.remove(&(deadline, id))
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes and returns the earliest task due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerId, u64, T)> {
        let (deadline, id) = *self.pending.keys().next()?;
        if deadline > now_ms {
            return None;
        }
        let task = self.pending.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        Some((id, deadline, task))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Cancel-and-reschedule over a [`TimerQueue`]: only the last trigger within
/// the quiet period fires.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period_ms: u64,
    pending: Option<TimerId>,
}

impl Debouncer {
    pub fn new(quiet_period_ms: u64) -> Self {
        Self {
            quiet_period_ms,
            pending: None,
        }
    }

    pub fn trigger<T>(&mut self, timers: &mut TimerQueue<T>, now_ms: u64, task: T) -> TimerId {
        if let Some(previous) = self.pending.take() {
            timers.cancel(previous);
        }
        let id = timers.schedule(now_ms, self.quiet_period_ms, task);
        self.pending = Some(id);
        id
    }

    /// Marks `fired` as delivered. Returns false for timers this debouncer
    /// no longer owns.
    pub fn settle(&mut self, fired: TimerId) -> bool {
        if self.pending == Some(fired) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
