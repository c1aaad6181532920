#![no_std]
#![forbid(unsafe_code)]

//! # Light Node Application
//!
//! Wires the sensor, the indicator LED, the radio link and the PWM timer to
//! the event scheduler. Interrupt handlers only post events; everything else
//! runs from [`Node::poll`] in the main loop.

pub mod events;

mod config;
mod io;
mod node;

pub use config::{NodeConfig, NodeConfigBuilder, DARK_THRESHOLD};
pub use io::{Indicator, PeriodicTimer, RadioLink};
pub use node::{light_report, LightReport, Node, Peripherals, MESSAGE_CAPACITY};

#[cfg(feature = "std")]
extern crate std;
