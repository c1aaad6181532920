//! Handler registry and the drain pass.

use core::fmt;

use hal::fatal;
use heapless::Vec;

use crate::event::{EventId, EventSet};
use crate::scheduler::Scheduler;

/// Maximum number of handlers, one per mask bit.
pub const MAX_HANDLERS: usize = EventId::CAPACITY as usize;

/// Application handler. Receives no payload beyond the context; results are
/// fetched from the drivers the context owns.
pub type Handler<C> = fn(&mut C);

/// Outcome of one [`Dispatcher::drain`] pass.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Nothing was pending when the snapshot was taken.
    Idle,
    /// This many handlers ran.
    Dispatched(u32),
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// A handler is already registered for this event.
    Duplicate(EventId),
    /// The registry has no room left.
    Full,
    /// Events were pending that no handler services.
    Unhandled(EventSet),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(id) => write!(f, "{id} already has a handler"),
            Self::Full => write!(f, "handler registry full"),
            Self::Unhandled(set) => write!(f, "no handler for pending events {set}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DispatchError {}

/// Maps events to handlers and drains the scheduler.
///
/// Handlers run in registration order. A bit is cleared only after its
/// handler returns, so an event posted while a *different* handler runs stays
/// pending for the next pass. An event re-posted by its own handler coalesces
/// with the occurrence being serviced.
pub struct Dispatcher<C, const N: usize = MAX_HANDLERS> {
    handlers: Vec<(EventId, Handler<C>), N>,
    registered: EventSet,
}

impl<C, const N: usize> Dispatcher<C, N> {
    pub const fn new() -> Self {
        Self {
            handlers: Vec::new(),
            registered: EventSet::empty(),
        }
    }

    pub fn register(&mut self, id: EventId, handler: Handler<C>) -> Result<(), DispatchError> {
        if self.registered.contains(id) {
            return Err(DispatchError::Duplicate(id));
        }
        self.handlers
            .push((id, handler))
            .map_err(|_| DispatchError::Full)?;
        self.registered = self.registered.with(id);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, id: EventId, handler: Handler<C>) -> Result<Self, DispatchError> {
        self.register(id, handler)?;
        Ok(self)
    }

    pub fn registered(&self) -> EventSet {
        self.registered
    }

    /// Runs one pass over a snapshot of the pending mask.
    pub fn try_drain(&self, scheduler: &Scheduler, ctx: &mut C) -> Result<Pass, DispatchError> {
        let snapshot = scheduler.pending();
        if snapshot.is_empty() {
            return Ok(Pass::Idle);
        }

        let unhandled = EventSet::from_bits(snapshot.bits() & !self.registered.bits());
        if !unhandled.is_empty() {
            return Err(DispatchError::Unhandled(unhandled));
        }

        let mut ran = 0;
        for (id, handler) in self.handlers.iter() {
            if snapshot.contains(*id) {
                log::debug!("dispatch {}", id);
                handler(ctx);
                scheduler.clear(*id);
                ran += 1;
            }
        }
        Ok(Pass::Dispatched(ran))
    }

    /// [`try_drain`](Self::try_drain), halting on an event without a handler.
    pub fn drain(&self, scheduler: &Scheduler, ctx: &mut C) -> Pass {
        match self.try_drain(scheduler, ctx) {
            Ok(pass) => pass,
            Err(err) => fatal(&err),
        }
    }
}

impl<C, const N: usize> Default for Dispatcher<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec as StdVec;

    const FIRST: EventId = EventId::new(1);
    const SECOND: EventId = EventId::new(2);
    const LATE: EventId = EventId::new(7);

    struct Ctx<'a> {
        scheduler: &'a Scheduler,
        log: StdVec<EventId>,
    }

    fn on_first(ctx: &mut Ctx<'_>) {
        ctx.log.push(FIRST);
        // Raised as if by an interrupt while this handler runs.
        ctx.scheduler.post(LATE);
    }

    fn on_second(ctx: &mut Ctx<'_>) {
        ctx.log.push(SECOND);
    }

    fn on_late(ctx: &mut Ctx<'_>) {
        ctx.log.push(LATE);
    }

    fn dispatcher<'a>() -> Dispatcher<Ctx<'a>> {
        Dispatcher::new()
            .with(SECOND, on_second)
            .and_then(|d| d.with(FIRST, on_first))
            .and_then(|d| d.with(LATE, on_late))
            .unwrap()
    }

    #[test]
    fn idle_when_nothing_pending() {
        let scheduler = Scheduler::new();
        let mut ctx = Ctx {
            scheduler: &scheduler,
            log: StdVec::new(),
        };
        assert_eq!(dispatcher().drain(&scheduler, &mut ctx), Pass::Idle);
        assert!(ctx.log.is_empty());
    }

    #[test]
    fn runs_in_registration_order_and_clears() {
        let scheduler = Scheduler::new();
        let mut ctx = Ctx {
            scheduler: &scheduler,
            log: StdVec::new(),
        };
        scheduler.post(FIRST);
        scheduler.post(SECOND);

        assert_eq!(dispatcher().drain(&scheduler, &mut ctx), Pass::Dispatched(2));
        assert_eq!(ctx.log, [SECOND, FIRST]);
        assert!(!scheduler.is_pending(FIRST));
        assert!(!scheduler.is_pending(SECOND));
    }

    #[test]
    fn event_raised_during_pass_waits_for_next_pass() {
        let scheduler = Scheduler::new();
        let mut ctx = Ctx {
            scheduler: &scheduler,
            log: StdVec::new(),
        };
        let dispatcher = dispatcher();
        scheduler.post(FIRST);

        assert_eq!(dispatcher.drain(&scheduler, &mut ctx), Pass::Dispatched(1));
        assert!(scheduler.is_pending(LATE));

        assert_eq!(dispatcher.drain(&scheduler, &mut ctx), Pass::Dispatched(1));
        assert_eq!(ctx.log, [FIRST, LATE]);
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut d: Dispatcher<Ctx<'_>> = Dispatcher::new();
        d.register(FIRST, on_first).unwrap();
        assert_eq!(d.register(FIRST, on_second), Err(DispatchError::Duplicate(FIRST)));
    }

    #[test]
    fn registry_capacity() {
        let mut d: Dispatcher<Ctx<'_>, 1> = Dispatcher::new();
        d.register(FIRST, on_first).unwrap();
        assert_eq!(d.register(SECOND, on_second), Err(DispatchError::Full));
        assert!(!d.registered().contains(SECOND));
    }

    #[test]
    fn unhandled_event_reported() {
        let scheduler = Scheduler::new();
        let mut ctx = Ctx {
            scheduler: &scheduler,
            log: StdVec::new(),
        };
        let stray = EventId::new(20);
        scheduler.post(stray);

        assert_eq!(
            dispatcher().try_drain(&scheduler, &mut ctx),
            Err(DispatchError::Unhandled(EventSet::from(stray)))
        );
        assert!(ctx.log.is_empty());
    }

    #[test]
    #[should_panic(expected = "no handler for pending events")]
    fn drain_halts_on_unhandled_event() {
        let scheduler = Scheduler::new();
        let mut ctx = Ctx {
            scheduler: &scheduler,
            log: StdVec::new(),
        };
        scheduler.post(FIRST);
        scheduler.post(EventId::new(20));
        dispatcher().drain(&scheduler, &mut ctx);
    }
}
