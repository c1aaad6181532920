//! Simulated bus controller with the SI1133 model attached.

use hal::{Command, HalError, HalResult, I2cAddress, I2cConfig, I2cController, IrqFlags};
use node_i2c::{SubEventQueue, DEFAULT_QUEUE_DEPTH};

use crate::sensor::Si1133Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// START sent, next byte is an address.
    Address,
    /// Write addressed, next byte sets the register pointer.
    Register,
    Transmit,
    Receive,
    /// Nobody answered the address.
    Unanswered,
}

/// Controller that answers on behalf of an [`Si1133Model`].
///
/// Interrupts are delivered synchronously: whenever a flag becomes pending
/// and is enabled, the controller runs the channel's interrupt routine on
/// itself before returning to the caller.
pub struct SimI2c<'a, const Q: usize = DEFAULT_QUEUE_DEPTH> {
    channel: &'a SubEventQueue<Q>,
    sensor: Si1133Model,
    config: Option<I2cConfig>,
    flags: IrqFlags,
    enabled: IrqFlags,
    rx: u8,
    phase: Phase,
}

impl<'a, const Q: usize> SimI2c<'a, Q> {
    pub fn new(channel: &'a SubEventQueue<Q>, sensor: Si1133Model) -> Self {
        Self {
            channel,
            sensor,
            config: None,
            flags: IrqFlags::empty(),
            enabled: IrqFlags::empty(),
            rx: 0,
            phase: Phase::Idle,
        }
    }

    pub fn sensor(&self) -> &Si1133Model {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut Si1133Model {
        &mut self.sensor
    }

    pub fn config(&self) -> Option<&I2cConfig> {
        self.config.as_ref()
    }

    fn raise(&mut self, flags: IrqFlags) {
        self.flags |= flags;
        if !(self.flags & self.enabled).is_empty() {
            let channel = self.channel;
            channel.on_interrupt(self);
        }
    }

    fn address(&mut self, byte: u8) {
        if I2cAddress::new(byte >> 1) != self.sensor.address() {
            log::debug!("sim i2c: no device at {:#04x}", byte >> 1);
            self.phase = Phase::Unanswered;
            return;
        }
        if byte & 1 == 1 {
            self.phase = Phase::Receive;
            self.rx = self.sensor.read();
            self.raise(IrqFlags::ACK | IrqFlags::RXDATAV);
        } else {
            self.phase = Phase::Register;
            self.raise(IrqFlags::ACK);
        }
    }
}

impl<const Q: usize> I2cController for SimI2c<'_, Q> {
    fn configure(&mut self, config: &I2cConfig) -> HalResult<()> {
        if !config.master {
            return Err(HalError::ConfigurationError);
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn command(&mut self, command: Command) {
        if command.contains(Command::ABORT) {
            self.phase = Phase::Idle;
        }
        if command.contains(Command::START) {
            self.phase = Phase::Address;
        }
        if command.contains(Command::ACK) && self.phase == Phase::Receive {
            self.rx = self.sensor.read();
            self.raise(IrqFlags::RXDATAV);
        }
        if command.contains(Command::STOP) {
            self.phase = Phase::Idle;
            self.raise(IrqFlags::MSTOP);
        }
    }

    fn write_tx(&mut self, byte: u8) {
        match self.phase {
            Phase::Address => self.address(byte),
            Phase::Register => {
                self.sensor.set_pointer(byte);
                self.phase = Phase::Transmit;
                self.raise(IrqFlags::ACK);
            }
            Phase::Transmit => {
                self.sensor.write(byte);
                self.raise(IrqFlags::ACK);
            }
            Phase::Idle | Phase::Receive | Phase::Unanswered => {
                log::warn!("sim i2c: {:#04x} written outside a transfer", byte);
            }
        }
    }

    fn read_rx(&mut self) -> u8 {
        self.rx
    }

    fn flags(&self) -> IrqFlags {
        self.flags
    }

    fn clear_flags(&mut self, flags: IrqFlags) {
        self.flags = self.flags & !flags;
    }

    fn enabled_irqs(&self) -> IrqFlags {
        self.enabled
    }

    fn set_enabled_irqs(&mut self, irqs: IrqFlags) {
        self.enabled = irqs;
    }

    fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }
}
