//! Register-level model of the SI1133.

use std::collections::VecDeque;

use hal::I2cAddress;
use node_si1133::regs::{self, cmd};
use node_si1133::DEFAULT_ADDRESS;

const REGISTER_SPACE: usize = 0x40;
const REGISTER_MASK: u8 = 0x3F;

/// Simulated sensor behind the bus controller.
///
/// Models the register pointer with auto-increment, the command counter in
/// `RESPONSE0`, the parameter table and forced measurements. Each forced
/// measurement takes the next scripted reading; the last one repeats.
#[derive(Debug, Clone)]
pub struct Si1133Model {
    address: I2cAddress,
    registers: [u8; REGISTER_SPACE],
    params: [u8; REGISTER_SPACE],
    counter: u8,
    pointer: u8,
    readings: VecDeque<u16>,
    current: u16,
    forced: u32,
    reject_params: bool,
}

impl Default for Si1133Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Si1133Model {
    pub fn new() -> Self {
        Self::at(DEFAULT_ADDRESS)
    }

    pub fn at(address: I2cAddress) -> Self {
        Self {
            address,
            registers: [0; REGISTER_SPACE],
            params: [0; REGISTER_SPACE],
            counter: 0,
            pointer: 0,
            readings: VecDeque::new(),
            current: 0,
            forced: 0,
            reject_params: false,
        }
    }

    /// Readings handed out by successive forced measurements.
    pub fn with_readings<I: IntoIterator<Item = u16>>(mut self, readings: I) -> Self {
        self.readings.extend(readings);
        self
    }

    /// Leaves parameter writes unapplied and the counter unchanged.
    pub fn rejecting_params(mut self) -> Self {
        self.reject_params = true;
        self
    }

    pub fn address(&self) -> I2cAddress {
        self.address
    }

    pub fn set_light(&mut self, value: u16) {
        self.readings.clear();
        self.current = value;
    }

    pub fn param(&self, param: u8) -> u8 {
        self.params[usize::from(param & REGISTER_MASK)]
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    pub fn forced(&self) -> u32 {
        self.forced
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers[usize::from(register & REGISTER_MASK)]
    }

    pub(crate) fn set_pointer(&mut self, register: u8) {
        self.pointer = register & REGISTER_MASK;
    }

    pub(crate) fn write(&mut self, byte: u8) {
        let register = self.pointer;
        self.registers[usize::from(register)] = byte;
        self.pointer = (self.pointer + 1) & REGISTER_MASK;
        if register == regs::COMMAND {
            self.execute(byte);
        }
    }

    pub(crate) fn read(&mut self) -> u8 {
        let byte = self.registers[usize::from(self.pointer)];
        self.pointer = (self.pointer + 1) & REGISTER_MASK;
        byte
    }

    fn execute(&mut self, command: u8) {
        match command {
            cmd::RESET_CMD_CTR => self.counter = 0,
            cmd::FORCE => {
                if let Some(next) = self.readings.pop_front() {
                    self.current = next;
                }
                let [high, low] = self.current.to_be_bytes();
                self.registers[usize::from(regs::HOSTOUT0)] = high;
                self.registers[usize::from(regs::HOSTOUT1)] = low;
                self.forced += 1;
                self.advance_counter();
            }
            c if c & 0xC0 == cmd::PARAM_SET => {
                if self.reject_params {
                    log::debug!("si1133 model: parameter {:#04x} rejected", c & REGISTER_MASK);
                    return;
                }
                let value = self.registers[usize::from(regs::INPUT0)];
                self.params[usize::from(c & REGISTER_MASK)] = value;
                self.advance_counter();
            }
            other => log::warn!("si1133 model: unknown command {:#04x}", other),
        }
        self.registers[usize::from(regs::RESPONSE0)] = self.counter;
    }

    fn advance_counter(&mut self) {
        self.counter = (self.counter + 1) & regs::COUNTER_MASK;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_si1133::regs::param;

    #[test]
    fn param_set_applies_input_and_counts() {
        let mut model = Si1133Model::new();
        model.set_pointer(regs::INPUT0);
        model.write(regs::WHITE_LIGHT);
        model.set_pointer(regs::COMMAND);
        model.write(cmd::PARAM_SET | param::ADCCONFIG0);

        assert_eq!(model.param(param::ADCCONFIG0), regs::WHITE_LIGHT);
        assert_eq!(model.register(regs::RESPONSE0), 1);
    }

    #[test]
    fn force_publishes_reading_big_endian() {
        let mut model = Si1133Model::new().with_readings([0x0102]);
        model.set_pointer(regs::COMMAND);
        model.write(cmd::FORCE);

        model.set_pointer(regs::HOSTOUT0);
        assert_eq!([model.read(), model.read()], [0x01, 0x02]);
        assert_eq!(model.forced(), 1);
    }

    #[test]
    fn counter_wraps_and_resets() {
        let mut model = Si1133Model::new();
        for _ in 0..17 {
            model.set_pointer(regs::COMMAND);
            model.write(cmd::FORCE);
        }
        assert_eq!(model.counter(), 1);

        model.set_pointer(regs::COMMAND);
        model.write(cmd::RESET_CMD_CTR);
        assert_eq!(model.register(regs::RESPONSE0), 0);
    }
}
