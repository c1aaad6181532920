#![no_std]
#![forbid(unsafe_code)]

//! # I2C Transaction State Machine
//!
//! Non-blocking register reads and writes against a 7-bit peripheral. A
//! transaction is started from the main loop; from then on every step is
//! driven by a hardware *sub-event*:
//!
//! ```text
//!  start ─► AwaitAddressAck ─ACK─► AwaitRegisterAck ─ACK─► AwaitReadRestartAck
//!                │                                              │ ACK / RXDATAV
//!                │ ACK (write)                                  ▼
//!                ▼                                        ReceivingData ◄─┐ RXDATAV
//!           WritingData ◄─┐ ACK                               │ last byte ┘
//!                │ last ──┘                                     ▼
//!                └───────────────────────────────────────► AwaitStop ─MSTOP─► Idle
//! ```
//!
//! The interrupt service routine never touches the state machine. It
//! translates pending controller flags into [`SubEvent`]s and pushes them into
//! a [`SubEventQueue`]; the owner of the [`I2cBus`] drains that channel with
//! [`I2cBus::service`]. Each sub-event is handled to completion before the
//! next one is looked at.
//!
//! While a transaction is in flight the bus holds a vote against
//! [`BUS_BLOCK_MODE`] so the core cannot sleep deep enough to stop the bus
//! clock. When the stop condition is observed the vote is returned and the
//! transaction's completion event, if any, is posted to the scheduler.
//!
//! A transaction that never completes keeps the bus unavailable and the vote
//! outstanding; only the setup-phase wait can be bounded.

mod bus;
mod channel;
mod error;
mod state;
mod transaction;

pub use bus::{I2cBus, BUS_BLOCK_MODE};
pub use channel::{SubEventQueue, DEFAULT_QUEUE_DEPTH};
pub use error::{BusError, ProtocolError};
pub use state::{BusId, BusState, Mode, SubEvent};
pub use transaction::{Transaction, MAX_TRANSFER};

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(test)]
mod tests;
