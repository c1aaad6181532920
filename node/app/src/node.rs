use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use hal::{fatal, EnergyMode, I2cController, PowerControl};
use heapless::String;
use node_i2c::{I2cBus, DEFAULT_QUEUE_DEPTH};
use node_sched::{DispatchError, Dispatcher, Pass, Scheduler};
use node_si1133::Si1133;
use node_sleep::SleepArbiter;

use crate::config::NodeConfig;
use crate::events;
use crate::io::{Indicator, PeriodicTimer, RadioLink};

/// Longest radio message the node composes.
pub const MESSAGE_CAPACITY: usize = 64;

/// Devices the node drives besides the sensor.
pub struct Peripherals<L, R, T> {
    pub led: L,
    pub radio: R,
    pub timer: T,
}

/// Interpretation of one white-light reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightReport {
    pub dark: bool,
    pub message: String<MESSAGE_CAPACITY>,
}

/// Classifies `reading` against `threshold` and formats the radio message.
pub fn light_report(reading: u32, threshold: u32) -> LightReport {
    let dark = reading < threshold;
    let mut message = String::new();
    let written = if dark {
        write!(message, "It's dark = {reading}")
    } else {
        write!(message, "It's light outside = {reading}")
    };
    if written.is_err() {
        log::warn!("light report truncated");
    }
    LightReport { dark, message }
}

/// The light node: sensor, collaborators and the shared scheduling context.
pub struct Node<'a, C, L, R, T, const Q: usize = DEFAULT_QUEUE_DEPTH>
where
    C: I2cController,
{
    sensor: Si1133<'a, C, Q>,
    peripherals: Peripherals<L, R, T>,
    scheduler: &'a Scheduler,
    arbiter: &'a SleepArbiter,
    config: NodeConfig,
}

impl<'a, C, L, R, T, const Q: usize> Node<'a, C, L, R, T, Q>
where
    C: I2cController,
    L: Indicator,
    R: RadioLink,
    T: PeriodicTimer,
{
    pub fn new(
        bus: I2cBus<'a, C, Q>,
        peripherals: Peripherals<L, R, T>,
        scheduler: &'a Scheduler,
        arbiter: &'a SleepArbiter,
        config: NodeConfig,
    ) -> Self {
        Self {
            sensor: Si1133::new(bus, config.sensor.clone()),
            peripherals,
            scheduler,
            arbiter,
            config,
        }
    }

    /// Brings the node up.
    ///
    /// Resets the arbiter and the scheduler, runs the sensor handshake,
    /// takes the system-wide vote and queues the boot event. A failed
    /// handshake is fatal.
    pub fn open<D: DelayNs>(&mut self, delay: &mut D) {
        self.arbiter.open();
        self.scheduler.open();

        if let Err(err) = self.sensor.open(delay) {
            fatal(&err);
        }

        self.arbiter.block(self.config.system_block);
        self.scheduler.post(events::BOOT_UP);
        log::info!(
            "node up, sleeping no deeper than {}",
            self.arbiter.sleep_target().unwrap_or(EnergyMode::Em0)
        );
    }

    /// Handler table for every event the node raises.
    pub fn dispatcher() -> Dispatcher<Self> {
        let table: Result<Dispatcher<Self>, DispatchError> = Dispatcher::new()
            .with(events::BOOT_UP, Self::on_boot_up)
            .and_then(|d| d.with(events::LETIMER0_COMP0, Self::on_comp0))
            .and_then(|d| d.with(events::LETIMER0_COMP1, Self::on_comp1))
            .and_then(|d| d.with(events::LETIMER0_UF, Self::on_underflow))
            .and_then(|d| d.with(events::SI1133_LIGHT, Self::on_light))
            .and_then(|d| d.with(events::RADIO_TX_DONE, Self::on_tx_done));
        match table {
            Ok(table) => table,
            Err(err) => fatal(&err),
        }
    }

    /// One main-loop iteration.
    ///
    /// Services the bus channel, then runs every pending handler. A pass
    /// that found nothing pending ends in [`sleep_if_idle`](Self::sleep_if_idle).
    pub fn poll<P: PowerControl + ?Sized>(
        &mut self,
        dispatcher: &Dispatcher<Self>,
        power: &mut P,
    ) -> Pass {
        self.sensor.bus_mut().service();

        let scheduler = self.scheduler;
        let pass = dispatcher.drain(scheduler, self);
        if pass == Pass::Idle {
            self.sleep_if_idle(power);
        }
        pass
    }

    /// Sleeps at the permitted depth unless an event or a bus sub-event
    /// slipped in since the last drain.
    ///
    /// The check and the sleep request share one critical section; a
    /// pending interrupt still wakes the core. Returns the mode entered.
    pub fn sleep_if_idle<P: PowerControl + ?Sized>(&self, power: &mut P) -> Option<EnergyMode> {
        let channel = self.sensor.bus().channel();
        critical_section::with(|cs| {
            if !self.scheduler.pending_in(cs).is_empty() || !channel.is_empty_in(cs) {
                log::trace!("work arrived, staying awake");
                return None;
            }
            self.arbiter.enter_sleep(power)
        })
    }

    pub fn sensor(&self) -> &Si1133<'a, C, Q> {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut Si1133<'a, C, Q> {
        &mut self.sensor
    }

    pub fn peripherals(&self) -> &Peripherals<L, R, T> {
        &self.peripherals
    }

    pub fn peripherals_mut(&mut self) -> &mut Peripherals<L, R, T> {
        &mut self.peripherals
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    fn on_boot_up(&mut self) {
        self.peripherals.radio.send(self.config.boot_message);
        self.peripherals
            .timer
            .start(self.config.pwm_period, self.config.active_period);
    }

    fn on_comp0(&mut self) {}

    fn on_comp1(&mut self) {
        if let Err(err) = self.sensor.force() {
            log::warn!("measurement skipped: {}", err);
        }
    }

    fn on_underflow(&mut self) {
        if let Err(err) = self.sensor.read_white_light(events::SI1133_LIGHT) {
            log::warn!("light read skipped: {}", err);
        }
    }

    fn on_light(&mut self) {
        let report = light_report(self.sensor.read_result(), self.config.dark_threshold);
        self.peripherals.led.set(report.dark);
        self.peripherals.radio.send(&report.message);
    }

    fn on_tx_done(&mut self) {}
}
