//! The shared pending mask.

use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

use crate::event::{EventId, EventSet};

/// Process-wide set of pending events.
///
/// Producers (interrupt handlers, bus drivers) call [`post`](Self::post);
/// the single consumer reads [`pending`](Self::pending) and calls
/// [`clear`](Self::clear) once a handler has finished.
pub struct Scheduler {
    pending: Mutex<Cell<u32>>,
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(0)),
        }
    }

    /// Drops everything pending. Call before interrupts are enabled.
    pub fn open(&self) {
        critical_section::with(|cs| self.pending.borrow(cs).set(0));
        log::debug!("scheduler open");
    }

    /// Marks `id` pending. Safe from interrupt context; posting an event that
    /// is already pending has no further effect.
    pub fn post(&self, id: EventId) {
        critical_section::with(|cs| {
            let cell = self.pending.borrow(cs);
            cell.set(cell.get() | id.mask());
        });
        log::trace!("post {}", id);
    }

    /// Marks `id` handled.
    pub fn clear(&self, id: EventId) {
        critical_section::with(|cs| {
            let cell = self.pending.borrow(cs);
            cell.set(cell.get() & !id.mask());
        });
    }

    /// Snapshot of the pending mask.
    pub fn pending(&self) -> EventSet {
        critical_section::with(|cs| self.pending_in(cs))
    }

    /// Snapshot taken inside a critical section the caller already holds.
    pub fn pending_in(&self, cs: CriticalSection<'_>) -> EventSet {
        EventSet::from_bits(self.pending.borrow(cs).get())
    }

    pub fn is_pending(&self, id: EventId) -> bool {
        self.pending().contains(id)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: EventId = EventId::new(0);
    const B: EventId = EventId::new(3);

    #[test]
    fn starts_empty() {
        let scheduler = Scheduler::new();
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn duplicate_posts_coalesce() {
        let scheduler = Scheduler::new();
        scheduler.post(A);
        scheduler.post(A);
        assert_eq!(scheduler.pending().len(), 1);

        scheduler.clear(A);
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn clear_leaves_other_events() {
        let scheduler = Scheduler::new();
        scheduler.post(A);
        scheduler.post(B);
        scheduler.clear(A);

        assert!(!scheduler.is_pending(A));
        assert!(scheduler.is_pending(B));
    }

    #[test]
    fn open_discards_pending() {
        let scheduler = Scheduler::new();
        scheduler.post(B);
        scheduler.open();
        assert!(scheduler.pending().is_empty());
    }
}
