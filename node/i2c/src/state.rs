//! Bus identity, transfer direction, protocol states and sub-events.

use core::fmt;

/// Bus controller instance.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusId {
    I2c0,
    I2c1,
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c0 => f.write_str("I2C0"),
            Self::I2c1 => f.write_str("I2C1"),
        }
    }
}

/// Transfer direction of the data phase.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Write,
    Read,
}

/// Protocol position of a bus instance.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusState {
    /// No transaction in flight; the bus accepts a new one.
    #[default]
    Idle,
    /// Start and write-address sent, waiting for the peripheral to answer.
    AwaitAddressAck,
    /// Register address sent ahead of a read.
    AwaitRegisterAck,
    /// Repeated start and read-address sent.
    AwaitReadRestartAck,
    /// Shifting data bytes out, most significant first.
    WritingData,
    /// Shifting data bytes in, most significant first.
    ReceivingData,
    /// Stop requested, waiting for the controller to confirm it.
    AwaitStop,
}

/// Hardware notification delivered by the interrupt service routine.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubEvent {
    /// The peripheral acknowledged the last byte sent.
    AddressAcknowledged,
    /// A byte was received; it has already been read out of the controller.
    ByteAvailable(u8),
    /// The controller finished sending a stop condition.
    StopConditionObserved,
}
