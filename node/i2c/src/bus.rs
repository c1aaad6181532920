//! The per-instance transaction state machine.

use hal::{fatal, Command, EnergyMode, HalError, HalResult, I2cConfig, I2cController, IrqFlags};
use node_sched::Scheduler;
use node_sleep::SleepArbiter;

use crate::channel::{SubEventQueue, DEFAULT_QUEUE_DEPTH};
use crate::error::{BusError, ProtocolError};
use crate::state::{BusId, BusState, Mode, SubEvent};
use crate::transaction::{Transaction, MAX_TRANSFER};

/// Shallowest mode that stops the bus clock. Forbidden while a transaction
/// is in flight.
pub const BUS_BLOCK_MODE: EnergyMode = EnergyMode::Em2;

/// One bus controller and the transaction it is running.
///
/// At most one transaction is in flight per instance; the bus is available
/// exactly when it is in [`BusState::Idle`].
pub struct I2cBus<'a, C: I2cController, const Q: usize = DEFAULT_QUEUE_DEPTH> {
    id: BusId,
    controller: C,
    channel: &'a SubEventQueue<Q>,
    scheduler: &'a Scheduler,
    arbiter: &'a SleepArbiter,
    block_mode: EnergyMode,
    state: BusState,
    current: Option<Transaction>,
    remaining: u8,
    data: u32,
    last_read: u32,
}

impl<'a, C: I2cController, const Q: usize> I2cBus<'a, C, Q> {
    pub fn new(
        id: BusId,
        controller: C,
        channel: &'a SubEventQueue<Q>,
        scheduler: &'a Scheduler,
        arbiter: &'a SleepArbiter,
    ) -> Self {
        Self {
            id,
            controller,
            channel,
            scheduler,
            arbiter,
            block_mode: BUS_BLOCK_MODE,
            state: BusState::Idle,
            current: None,
            remaining: 0,
            data: 0,
            last_read: 0,
        }
    }

    /// Overrides the mode voted against while a transaction is in flight.
    pub fn with_block_mode(mut self, mode: EnergyMode) -> Self {
        self.block_mode = mode;
        self
    }

    /// Configures the controller, enables the configured sub-event
    /// interrupts and resets the bus.
    pub fn open(&mut self, config: &I2cConfig) -> HalResult<()> {
        self.controller.configure(config)?;
        self.controller.set_enabled_irqs(config.irqs);
        self.reset(config.reset_spin_limit)?;
        self.channel.clear();
        log::info!(
            "{} open at {} Hz, irqs {:#x}",
            self.id,
            config.speed.hz(),
            config.irqs.bits()
        );
        Ok(())
    }

    /// Aborts whatever the controller is doing and clocks a start/stop pair
    /// onto the bus so every peripheral returns to idle.
    ///
    /// Interrupts stay masked for the duration; the stop flag is polled.
    pub fn reset(&mut self, spin_limit: Option<u32>) -> HalResult<()> {
        self.controller.command(Command::ABORT);

        let saved = self.controller.enabled_irqs();
        self.controller.set_enabled_irqs(IrqFlags::empty());

        let pending = self.controller.flags();
        self.controller.clear_flags(pending);
        self.controller.command(Command::CLEAR_TX);
        self.controller.command(Command::START | Command::STOP);

        let mut spins: u32 = 0;
        while !self.controller.flags().contains(IrqFlags::MSTOP) {
            if spin_limit.is_some_and(|limit| spins >= limit) {
                self.controller.set_enabled_irqs(saved);
                log::error!("{} reset: no stop condition after {} polls", self.id, spins);
                return Err(HalError::Timeout);
            }
            spins = spins.saturating_add(1);
            core::hint::spin_loop();
        }

        let pending = self.controller.flags();
        self.controller.clear_flags(pending);
        self.controller.command(Command::ABORT);
        self.controller.set_enabled_irqs(saved);
        Ok(())
    }

    pub fn id(&self) -> BusId {
        self.id
    }

    pub fn state(&self) -> BusState {
        self.state
    }

    pub fn is_available(&self) -> bool {
        self.state == BusState::Idle
    }

    /// Bytes still to be shifted in the current transaction.
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Transfer word of the current, or last completed, transaction.
    pub fn data(&self) -> u32 {
        self.data
    }

    /// Transfer word of the most recent completed read.
    pub fn last_read(&self) -> u32 {
        self.last_read
    }

    pub fn current(&self) -> Option<&Transaction> {
        self.current.as_ref()
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn channel(&self) -> &'a SubEventQueue<Q> {
        self.channel
    }

    /// Issues `xfer`: votes against the bus block mode, then sends a start
    /// condition and the write-address byte. Returns immediately.
    ///
    /// Fails with [`BusError::Busy`] while a transaction is in flight.
    pub fn start(&mut self, xfer: Transaction) -> Result<(), BusError> {
        if self.state != BusState::Idle {
            return Err(BusError::Busy(self.id));
        }
        if xfer.len == 0 || xfer.len > MAX_TRANSFER {
            return Err(BusError::InvalidLength(xfer.len));
        }
        if !self.controller.is_idle() {
            fatal(&BusError::ControllerNotIdle(self.id));
        }

        self.arbiter.block(self.block_mode);

        self.remaining = xfer.len;
        self.data = xfer.data;
        self.current = Some(xfer);
        self.state = BusState::AwaitAddressAck;
        log::debug!(
            "{} start {:?} addr {:#04x} reg {:#04x} len {}",
            self.id,
            xfer.mode,
            xfer.address.get(),
            xfer.register,
            xfer.len
        );

        self.controller.command(Command::START);
        self.controller.write_tx(xfer.address.write_byte());
        Ok(())
    }

    /// Advances the state machine by one sub-event.
    pub fn handle(&mut self, event: SubEvent) -> Result<(), ProtocolError> {
        let Some(xfer) = self.current else {
            return Err(self.unexpected(event));
        };

        match (self.state, event) {
            (BusState::AwaitAddressAck, SubEvent::AddressAcknowledged) => {
                self.controller.write_tx(xfer.register);
                self.state = match xfer.mode {
                    Mode::Read => BusState::AwaitRegisterAck,
                    Mode::Write => BusState::WritingData,
                };
            }
            (BusState::AwaitRegisterAck, SubEvent::AddressAcknowledged) => {
                self.controller.command(Command::START);
                self.controller.write_tx(xfer.address.read_byte());
                self.state = BusState::AwaitReadRestartAck;
            }
            (BusState::AwaitReadRestartAck, SubEvent::AddressAcknowledged) => {
                self.state = BusState::ReceivingData;
            }
            (BusState::WritingData, SubEvent::AddressAcknowledged) => {
                self.remaining -= 1;
                let byte = self.byte_at(self.remaining);
                self.controller.write_tx(byte);
                if self.remaining == 0 {
                    self.controller.command(Command::STOP);
                    self.state = BusState::AwaitStop;
                }
            }
            // Acknowledge of the final data byte, raised after STOP was queued.
            (BusState::AwaitStop, SubEvent::AddressAcknowledged) if xfer.mode == Mode::Write => {}
            (
                BusState::AwaitReadRestartAck | BusState::ReceivingData,
                SubEvent::ByteAvailable(byte),
            ) => {
                self.remaining -= 1;
                self.store_byte(self.remaining, byte);
                if self.remaining > 0 {
                    self.controller.command(Command::ACK);
                    self.state = BusState::ReceivingData;
                } else {
                    self.controller.command(Command::NACK);
                    self.controller.command(Command::STOP);
                    self.state = BusState::AwaitStop;
                }
            }
            (BusState::AwaitStop, SubEvent::StopConditionObserved) => {
                self.finish(xfer);
            }
            _ => return Err(self.unexpected(event)),
        }
        Ok(())
    }

    /// Drains the sub-event channel, halting on a protocol violation.
    /// Returns the number of sub-events handled.
    pub fn service(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.channel.pop() {
            if let Err(err) = self.handle(event) {
                fatal(&err);
            }
            handled += 1;
        }
        handled
    }

    /// Services the channel until the bus is available again.
    ///
    /// This busy-wait is the only blocking call in the stack and belongs to
    /// the synchronous setup phase, before steady-state operation begins.
    /// `spin_limit` bounds the number of polls; `None` waits indefinitely.
    pub fn wait_available(&mut self, spin_limit: Option<u32>) -> HalResult<()> {
        let mut spins: u32 = 0;
        loop {
            self.service();
            if self.is_available() {
                return Ok(());
            }
            if spin_limit.is_some_and(|limit| spins >= limit) {
                log::error!("{} still {:?} after {} polls", self.id, self.state, spins);
                return Err(HalError::Timeout);
            }
            spins = spins.saturating_add(1);
            core::hint::spin_loop();
        }
    }

    fn finish(&mut self, xfer: Transaction) {
        self.arbiter.unblock(self.block_mode);
        self.state = BusState::Idle;
        if xfer.mode == Mode::Read {
            self.last_read = self.data;
        }
        log::debug!("{} done, data {:#010x}", self.id, self.data);
        if let Some(done) = xfer.done {
            self.scheduler.post(done);
        }
    }

    fn byte_at(&self, index: u8) -> u8 {
        (self.data >> (8 * u32::from(index))) as u8
    }

    fn store_byte(&mut self, index: u8, byte: u8) {
        let shift = 8 * u32::from(index);
        self.data = (self.data & !(0xFF << shift)) | (u32::from(byte) << shift);
    }

    fn unexpected(&self, event: SubEvent) -> ProtocolError {
        ProtocolError {
            bus: self.id,
            state: self.state,
            event,
        }
    }
}
