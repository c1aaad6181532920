#![no_std]
#![forbid(unsafe_code)]

//! # Event Scheduler
//!
//! Interrupt handlers must not run application code. Instead they *post* an
//! event: one bit in a process-wide pending mask. The main loop takes a
//! snapshot of the mask, runs the handler registered for every set bit and
//! clears each bit only after its handler returns.
//!
//! This is a flag-and-drain mechanism, not a queue. Posting an event that is
//! already pending is a no-op, and no priority exists between events beyond
//! the fixed order handlers were registered in.
//!
//! ## Module Overview
//! - [`event`]     – Event identifiers and pending sets.
//! - [`scheduler`] – The shared pending mask.
//! - [`dispatch`]  – Handler registry and the drain pass.

#[cfg(feature = "std")]
extern crate std;

pub mod dispatch;
pub mod event;
pub mod scheduler;

pub use dispatch::{DispatchError, Dispatcher, Handler, Pass, MAX_HANDLERS};
pub use event::{EventId, EventSet};
pub use scheduler::Scheduler;
