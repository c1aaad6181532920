mod write;

use std::collections::VecDeque;
use std::vec::Vec;

use hal::{Command, HalResult, I2cConfig, I2cController, IrqFlags};

/// Something the state machine asked the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Command(Command),
    Tx(u8),
}

/// Controller double that records every command and transmitted byte.
#[derive(Default)]
pub(crate) struct MockController {
    pub ops: Vec<Op>,
    pub flags: IrqFlags,
    pub enabled: IrqFlags,
    pub rx: VecDeque<u8>,
    pub busy: bool,
    /// Raise MSTOP as soon as a start/stop pair is commanded.
    pub stops_on_reset: bool,
    pub configured: Option<I2cConfig>,
}

impl MockController {
    pub fn responsive() -> Self {
        Self {
            stops_on_reset: true,
            ..Self::default()
        }
    }
}

impl I2cController for MockController {
    fn configure(&mut self, config: &I2cConfig) -> HalResult<()> {
        self.configured = Some(config.clone());
        Ok(())
    }

    fn command(&mut self, command: Command) {
        if self.stops_on_reset && command == (Command::START | Command::STOP) {
            self.flags |= IrqFlags::MSTOP;
        }
        self.ops.push(Op::Command(command));
    }

    fn write_tx(&mut self, byte: u8) {
        self.ops.push(Op::Tx(byte));
    }

    fn read_rx(&mut self) -> u8 {
        self.rx.pop_front().unwrap_or(0xFF)
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
        !self.busy
    }
}
