//! Collaborators outside the control stack.

use core::time::Duration;

/// Indicator LED.
pub trait Indicator {
    fn set(&mut self, on: bool);
}

/// Outbound text link to the radio module.
///
/// Sending is fire-and-forget; the link posts its own completion event when
/// the transmit finishes.
pub trait RadioLink {
    fn send(&mut self, message: &str);
}

/// Low-energy PWM timer.
///
/// Once started it posts the start-of-window, end-of-window and period
/// events to the scheduler from its interrupt handler.
pub trait PeriodicTimer {
    fn start(&mut self, period: Duration, active: Duration);
}
