//! Bus errors.

use core::fmt;

use crate::state::{BusId, BusState, SubEvent};
use crate::transaction::MAX_TRANSFER;

/// Errors reported when issuing a transaction.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// A transaction is still in flight on this bus.
    Busy(BusId),
    /// Data phase must carry 1..=4 bytes.
    InvalidLength(u8),
    /// The controller is not idle although no transaction is tracked.
    ControllerNotIdle(BusId),
    /// The sub-event channel overflowed; a hardware notification was lost.
    ChannelFull,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy(bus) => write!(f, "{bus} busy"),
            Self::InvalidLength(len) => {
                write!(f, "transfer of {len} bytes, expected 1..={MAX_TRANSFER}")
            }
            Self::ControllerNotIdle(bus) => write!(f, "{bus} controller not idle at start"),
            Self::ChannelFull => write!(f, "sub-event channel full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BusError {}

/// Sub-event delivered in a state that does not expect it.
///
/// The software model and the hardware have diverged; there is no recovery.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolError {
    pub bus: BusId,
    pub state: BusState,
    pub event: SubEvent,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: unexpected {:?} in {:?}",
            self.bus, self.event, self.state
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}
