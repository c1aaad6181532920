//! Console stand-ins for the LED and the radio link.

use node_app::{events, Indicator, RadioLink};
use node_sched::Scheduler;

/// Radio link that prints each message and completes the transmit at once.
pub struct ConsoleRadio<'a> {
    scheduler: &'a Scheduler,
    sent: Vec<String>,
    echo: bool,
}

impl<'a> ConsoleRadio<'a> {
    pub fn new(scheduler: &'a Scheduler) -> Self {
        Self {
            scheduler,
            sent: Vec::new(),
            echo: false,
        }
    }

    /// Prints every message to stdout as it is sent.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl RadioLink for ConsoleRadio<'_> {
    fn send(&mut self, message: &str) {
        if self.echo {
            println!("radio> {message}");
        }
        log::debug!("radio tx {:?}", message);
        self.sent.push(message.to_owned());
        self.scheduler.post(events::RADIO_TX_DONE);
    }
}

#[derive(Debug, Default)]
pub struct ConsoleLed {
    on: bool,
    changes: u32,
}

impl ConsoleLed {
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Number of on/off transitions so far.
    pub fn changes(&self) -> u32 {
        self.changes
    }
}

impl Indicator for ConsoleLed {
    fn set(&mut self, on: bool) {
        if on != self.on {
            self.on = on;
            self.changes += 1;
            log::info!("LED {}", if on { "on" } else { "off" });
        }
    }
}
