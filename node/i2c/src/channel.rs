//! Interrupt-to-consumer sub-event channel.

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};
use hal::{fatal, I2cController, IrqFlags};
use heapless::Deque;

use crate::error::BusError;
use crate::state::SubEvent;

/// Channel depth that covers the longest transaction between two services.
pub const DEFAULT_QUEUE_DEPTH: usize = 8;

/// Bounded FIFO of sub-events, filled from interrupt context.
pub struct SubEventQueue<const N: usize = DEFAULT_QUEUE_DEPTH> {
    events: Mutex<RefCell<Deque<SubEvent, N>>>,
}

impl<const N: usize> SubEventQueue<N> {
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Appends `event`. A full channel means a hardware notification would
    /// be lost, which is fatal.
    pub fn push(&self, event: SubEvent) {
        let overflow = critical_section::with(|cs| {
            self.events.borrow_ref_mut(cs).push_back(event).is_err()
        });
        if overflow {
            fatal(&BusError::ChannelFull);
        }
    }

    pub fn pop(&self) -> Option<SubEvent> {
        critical_section::with(|cs| self.events.borrow_ref_mut(cs).pop_front())
    }

    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.is_empty_in(cs))
    }

    /// Emptiness check inside a critical section the caller already holds.
    pub fn is_empty_in(&self, cs: CriticalSection<'_>) -> bool {
        self.events.borrow_ref(cs).is_empty()
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.events.borrow_ref(cs).len())
    }

    pub fn clear(&self) {
        critical_section::with(|cs| self.events.borrow_ref_mut(cs).clear());
    }

    /// Interrupt service routine body for one bus controller.
    ///
    /// Takes the pending flags that are also enabled, clears them and queues
    /// the matching sub-events in the order acknowledge, received byte, stop.
    /// Returns the flags that were serviced.
    pub fn on_interrupt<C: I2cController + ?Sized>(&self, controller: &mut C) -> IrqFlags {
        let flags = controller.flags() & controller.enabled_irqs();
        controller.clear_flags(flags);

        if flags.contains(IrqFlags::ACK) {
            self.push(SubEvent::AddressAcknowledged);
        }
        if flags.contains(IrqFlags::RXDATAV) {
            self.push(SubEvent::ByteAvailable(controller.read_rx()));
        }
        if flags.contains(IrqFlags::MSTOP) {
            self.push(SubEvent::StopConditionObserved);
        }
        flags
    }
}

impl<const N: usize> Default for SubEventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
