//! Simulated low-energy timer and power controller.
//!
//! Both share one [`SimClock`]. Entering a sleep mode advances simulated
//! time to the next timer edge and raises that edge's event, which is what
//! wakes the core on hardware.

use core::cell::RefCell;
use std::time::Duration;

use critical_section::Mutex;
use hal::{EnergyMode, PowerControl};
use node_app::{events, PeriodicTimer};
use node_sched::{EventId, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// Counter reached the active-window compare value.
    Compare,
    /// Counter wrapped at the end of the period.
    Underflow,
}

#[derive(Debug, Default)]
struct ClockState {
    now: Duration,
    period: Duration,
    active: Duration,
    period_start: Duration,
    next: Option<Edge>,
}

/// Simulated time base shared by [`SimTimer`] and [`SimPower`].
pub struct SimClock<'a> {
    scheduler: &'a Scheduler,
    state: Mutex<RefCell<ClockState>>,
    realtime: bool,
}

impl<'a> SimClock<'a> {
    pub fn new(scheduler: &'a Scheduler) -> Self {
        Self {
            scheduler,
            state: Mutex::new(RefCell::new(ClockState::default())),
            realtime: false,
        }
    }

    /// Sleeps the host thread for the simulated gap on every wake-up.
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn now(&self) -> Duration {
        critical_section::with(|cs| self.state.borrow_ref(cs).now)
    }

    pub fn is_running(&self) -> bool {
        critical_section::with(|cs| self.state.borrow_ref(cs).next.is_some())
    }

    fn start(&self, period: Duration, active: Duration) {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            state.period = period;
            state.active = active.min(period);
            state.period_start = state.now;
            state.next = Some(Edge::Compare);
        });
        log::info!("timer started: period {:?}, active {:?}", period, active);
    }

    /// Jumps to the next timer edge and posts its event.
    ///
    /// Returns `None` if the timer was never started; nothing could wake
    /// the core in that case.
    pub fn wake(&self) -> Option<EventId> {
        let (event, gap) = critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            let edge = state.next?;
            let (at, event, next) = match edge {
                Edge::Compare => (
                    state.period_start + (state.period - state.active),
                    events::LETIMER0_COMP1,
                    Edge::Underflow,
                ),
                Edge::Underflow => (
                    state.period_start + state.period,
                    events::LETIMER0_UF,
                    Edge::Compare,
                ),
            };
            let gap = at.saturating_sub(state.now);
            state.now = at;
            if edge == Edge::Underflow {
                state.period_start = at;
            }
            state.next = Some(next);
            self.scheduler.post(event);
            Some((event, gap))
        })?;

        if self.realtime {
            std::thread::sleep(gap);
        }
        Some(event)
    }
}

/// PWM timer handle given to the node.
pub struct SimTimer<'a> {
    clock: &'a SimClock<'a>,
}

impl<'a> SimTimer<'a> {
    pub fn new(clock: &'a SimClock<'a>) -> Self {
        Self { clock }
    }
}

impl PeriodicTimer for SimTimer<'_> {
    fn start(&mut self, period: Duration, active: Duration) {
        self.clock.start(period, active);
    }
}

/// Power controller that records every sleep and wakes on the next timer
/// edge.
pub struct SimPower<'a> {
    clock: &'a SimClock<'a>,
    entered: [u32; EnergyMode::COUNT],
}

impl<'a> SimPower<'a> {
    pub fn new(clock: &'a SimClock<'a>) -> Self {
        Self {
            clock,
            entered: [0; EnergyMode::COUNT],
        }
    }

    /// Times `mode` was entered.
    pub fn entered(&self, mode: EnergyMode) -> u32 {
        self.entered[mode.index()]
    }

    pub fn sleeps(&self) -> u32 {
        self.entered.iter().sum()
    }
}

impl PowerControl for SimPower<'_> {
    fn enter(&mut self, mode: EnergyMode) {
        self.entered[mode.index()] += 1;
        log::trace!("enter {}", mode);
        if self.clock.wake().is_none() {
            log::warn!("{} entered with no wake-up source", mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_alternate_within_the_period() {
        let scheduler = Scheduler::new();
        let clock = SimClock::new(&scheduler);
        let mut timer = SimTimer::new(&clock);
        assert_eq!(clock.wake(), None);

        timer.start(Duration::from_millis(2000), Duration::from_millis(2));

        assert_eq!(clock.wake(), Some(events::LETIMER0_COMP1));
        assert_eq!(clock.now(), Duration::from_millis(1998));
        assert_eq!(clock.wake(), Some(events::LETIMER0_UF));
        assert_eq!(clock.now(), Duration::from_millis(2000));
        assert_eq!(clock.wake(), Some(events::LETIMER0_COMP1));
        assert_eq!(clock.now(), Duration::from_millis(3998));

        assert!(scheduler.is_pending(events::LETIMER0_COMP1));
        assert!(scheduler.is_pending(events::LETIMER0_UF));
    }

    #[test]
    fn power_counts_modes() {
        let scheduler = Scheduler::new();
        let clock = SimClock::new(&scheduler);
        let mut power = SimPower::new(&clock);
        power.enter(EnergyMode::Em2);
        power.enter(EnergyMode::Em2);
        power.enter(EnergyMode::Em1);
        assert_eq!(power.entered(EnergyMode::Em2), 2);
        assert_eq!(power.sleeps(), 3);
    }
}
