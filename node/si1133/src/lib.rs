#![no_std]
#![forbid(unsafe_code)]

//! # SI1133 Light Sensor Client
//!
//! Thin sequencer that turns sensor operations into bus transactions. It owns
//! the [`I2cBus`](node_i2c::I2cBus) the sensor sits on and adds nothing to the
//! protocol itself.
//!
//! The configuration handshake run by [`Si1133::open`] is synchronous: each
//! step waits for the bus to become available before issuing the next. After
//! that every operation returns as soon as its transaction is started; a
//! completion event tells the application when the result is ready.

pub mod regs;

mod config;
mod error;
mod sensor;

pub use config::{Si1133Config, Si1133ConfigBuilder, DEFAULT_ADDRESS, STARTUP_DELAY_MS};
pub use error::Si1133Error;
pub use sensor::Si1133;

#[cfg(feature = "std")]
extern crate std;
