//! Host port of the light node.
//!
//! Runs the unmodified control stack against a simulated bus controller
//! with an SI1133 register model attached, a simulated low-energy timer and
//! power controller, and console stand-ins for the LED and the radio.
//! Everything executes on one thread; simulated interrupts run to
//! completion inside the controller call that raises them.

mod cli;
mod clock;
mod console;
mod controller;
mod delay;
mod error;
mod logger;
mod runtime;
mod sensor;

pub use cli::Args;
pub use clock::{SimClock, SimPower, SimTimer};
pub use console::{ConsoleLed, ConsoleRadio};
pub use controller::SimI2c;
pub use delay::SimDelay;
pub use error::PortError;
pub use logger::{init_logger, log_filter, LOG_ENV};
pub use runtime::{PosixRuntime, RunStats, StopHandle};
pub use sensor::Si1133Model;

/// The node as wired on the host.
pub type SimNode<'a> = node_app::Node<'a, SimI2c<'a>, ConsoleLed, ConsoleRadio<'a>, SimTimer<'a>>;
