//! Transaction requests.

use hal::I2cAddress;
use node_sched::EventId;

use crate::state::Mode;

/// Largest data phase, in bytes. Data travels packed in a `u32`.
pub const MAX_TRANSFER: u8 = 4;

/// One register read or write.
///
/// Multi-byte values are packed big-endian into `data`: the first byte on
/// the wire is the most significant byte of the transfer.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub address: I2cAddress,
    pub mode: Mode,
    pub register: u8,
    pub len: u8,
    pub data: u32,
    /// Posted to the scheduler once the stop condition is observed.
    pub done: Option<EventId>,
}

impl Transaction {
    pub const fn read(address: I2cAddress, register: u8, len: u8) -> Self {
        Self {
            address,
            mode: Mode::Read,
            register,
            len,
            data: 0,
            done: None,
        }
    }

    pub const fn write(address: I2cAddress, register: u8, len: u8, data: u32) -> Self {
        Self {
            address,
            mode: Mode::Write,
            register,
            len,
            data,
            done: None,
        }
    }

    /// Posts `event` when the transaction completes.
    pub const fn notify(mut self, event: EventId) -> Self {
        self.done = Some(event);
        self
    }

    /// Like [`notify`](Self::notify) but accepts "no event".
    pub const fn notify_opt(mut self, event: Option<EventId>) -> Self {
        self.done = event;
        self
    }
}
