use embedded_hal::delay::DelayNs;
use hal::I2cController;
use node_i2c::{I2cBus, Transaction, DEFAULT_QUEUE_DEPTH};
use node_sched::EventId;

use crate::config::Si1133Config;
use crate::error::Si1133Error;
use crate::regs::{self, cmd, param};

/// SI1133 on a dedicated bus instance.
pub struct Si1133<'a, C: I2cController, const Q: usize = DEFAULT_QUEUE_DEPTH> {
    bus: I2cBus<'a, C, Q>,
    config: Si1133Config,
}

impl<'a, C: I2cController, const Q: usize> Si1133<'a, C, Q> {
    pub fn new(bus: I2cBus<'a, C, Q>, config: Si1133Config) -> Self {
        Self { bus, config }
    }

    pub fn config(&self) -> &Si1133Config {
        &self.config
    }

    pub fn bus(&self) -> &I2cBus<'a, C, Q> {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut I2cBus<'a, C, Q> {
        &mut self.bus
    }

    /// Waits out the sensor's startup time, opens the bus and runs the
    /// configuration handshake.
    pub fn open<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Si1133Error> {
        delay.delay_ms(self.config.startup_delay_ms);
        self.bus.open(&self.config.bus)?;
        self.configure()?;
        log::info!(
            "si1133 at {:#04x} configured for white light",
            self.config.address.get()
        );
        Ok(())
    }

    /// Selects the white photodiode group on channel 0.
    ///
    /// Each parameter write is checked against the command counter in
    /// `RESPONSE0`, which advances once per accepted command.
    pub fn configure(&mut self) -> Result<(), Si1133Error> {
        self.write_blocking(regs::COMMAND, cmd::RESET_CMD_CTR)?;
        let start = self.read_counter()?;

        self.set_param(param::ADCCONFIG0, regs::WHITE_LIGHT)?;
        self.expect_counter(param::ADCCONFIG0, regs::counter_after(start, 1))?;

        self.set_param(param::CHAN_LIST, regs::CHANNEL0)?;
        self.expect_counter(param::CHAN_LIST, regs::counter_after(start, 2))?;
        Ok(())
    }

    /// Starts a register read of `len` bytes.
    pub fn read(&mut self, register: u8, len: u8, done: Option<EventId>) -> Result<(), Si1133Error> {
        let xfer = Transaction::read(self.config.address, register, len).notify_opt(done);
        self.bus.start(xfer)?;
        Ok(())
    }

    /// Starts a register write of the low `len` bytes of `value`.
    pub fn write(
        &mut self,
        register: u8,
        len: u8,
        value: u32,
        done: Option<EventId>,
    ) -> Result<(), Si1133Error> {
        let xfer = Transaction::write(self.config.address, register, len, value).notify_opt(done);
        self.bus.start(xfer)?;
        Ok(())
    }

    /// Triggers one measurement of the configured channels.
    pub fn force(&mut self) -> Result<(), Si1133Error> {
        self.write(regs::COMMAND, 1, u32::from(cmd::FORCE), None)
    }

    /// Reads the 2-byte white-light result; `done` is posted when it arrives.
    pub fn read_white_light(&mut self, done: EventId) -> Result<(), Si1133Error> {
        self.read(regs::HOSTOUT0, 2, Some(done))
    }

    /// Result of the most recent completed read.
    pub fn read_result(&self) -> u32 {
        self.bus.last_read()
    }

    pub fn is_available(&self) -> bool {
        self.bus.is_available()
    }

    /// Drives the bus until the current transaction completes, bounded by
    /// the configured setup spin limit.
    pub fn wait_available(&mut self) -> Result<(), Si1133Error> {
        self.bus.wait_available(self.config.setup_spin_limit)?;
        Ok(())
    }

    fn write_blocking(&mut self, register: u8, value: u8) -> Result<(), Si1133Error> {
        self.write(register, 1, u32::from(value), None)?;
        self.wait_available()
    }

    fn set_param(&mut self, param: u8, value: u8) -> Result<(), Si1133Error> {
        self.write_blocking(regs::INPUT0, value)?;
        self.write_blocking(regs::COMMAND, cmd::PARAM_SET | param)
    }

    fn read_counter(&mut self) -> Result<u8, Si1133Error> {
        self.read(regs::RESPONSE0, 1, None)?;
        self.wait_available()?;
        Ok(self.bus.last_read() as u8 & regs::COUNTER_MASK)
    }

    fn expect_counter(&mut self, param: u8, expected: u8) -> Result<(), Si1133Error> {
        let found = self.read_counter()?;
        if found != expected {
            log::error!("si1133 parameter {:#04x} rejected", param);
            return Err(Si1133Error::CommandCounter {
                param,
                expected,
                found,
            });
        }
        log::debug!("si1133 parameter {:#04x} applied", param);
        Ok(())
    }
}
