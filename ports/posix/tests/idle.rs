//! The idle decision at the end of a main-loop pass.

use hal::{EnergyMode, I2cAddress, PowerControl};
use node_app::{events, Node, NodeConfig, Peripherals};
use node_i2c::{BusId, BusState, I2cBus, SubEvent, SubEventQueue, Transaction};
use node_posix::{ConsoleLed, ConsoleRadio, Si1133Model, SimClock, SimDelay, SimI2c, SimNode, SimTimer};
use node_sched::{Pass, Scheduler};
use node_sleep::SleepArbiter;

/// Records requested modes without waking anything.
#[derive(Default)]
struct Recorder {
    modes: Vec<EnergyMode>,
}

impl PowerControl for Recorder {
    fn enter(&mut self, mode: EnergyMode) {
        self.modes.push(mode);
    }
}

/// An opened node with nothing pending.
fn opened<'a>(
    scheduler: &'a Scheduler,
    arbiter: &'a SleepArbiter,
    channel: &'a SubEventQueue,
    clock: &'a SimClock<'a>,
) -> SimNode<'a> {
    let controller = SimI2c::new(channel, Si1133Model::new());
    let bus = I2cBus::new(BusId::I2c1, controller, channel, scheduler, arbiter);
    let peripherals = Peripherals {
        led: ConsoleLed::default(),
        radio: ConsoleRadio::new(scheduler),
        timer: SimTimer::new(clock),
    };
    let mut node: SimNode<'a> = Node::new(bus, peripherals, scheduler, arbiter, NodeConfig::default());
    node.open(&mut SimDelay::default());
    scheduler.clear(events::BOOT_UP);
    node
}

#[test]
fn idle_pass_sleeps_at_system_depth() {
    let scheduler = Scheduler::new();
    let arbiter = SleepArbiter::new();
    let channel: SubEventQueue = SubEventQueue::new();
    let clock = SimClock::new(&scheduler);
    let mut node = opened(&scheduler, &arbiter, &channel, &clock);
    let dispatcher = SimNode::dispatcher();
    let mut power = Recorder::default();

    assert_eq!(node.poll(&dispatcher, &mut power), Pass::Idle);
    assert_eq!(power.modes, [EnergyMode::Em2]);
}

#[test]
fn queued_sub_event_keeps_core_awake() {
    let scheduler = Scheduler::new();
    let arbiter = SleepArbiter::new();
    let channel: SubEventQueue = SubEventQueue::new();
    let clock = SimClock::new(&scheduler);
    let node = opened(&scheduler, &arbiter, &channel, &clock);
    let mut power = Recorder::default();

    // Interrupt landed after the channel was serviced.
    channel.push(SubEvent::AddressAcknowledged);

    assert_eq!(node.sleep_if_idle(&mut power), None);
    assert!(power.modes.is_empty());
    assert_eq!(channel.len(), 1);
}

#[test]
fn event_posted_after_drain_keeps_core_awake() {
    let scheduler = Scheduler::new();
    let arbiter = SleepArbiter::new();
    let channel: SubEventQueue = SubEventQueue::new();
    let clock = SimClock::new(&scheduler);
    let node = opened(&scheduler, &arbiter, &channel, &clock);
    let mut power = Recorder::default();

    scheduler.post(events::LETIMER0_UF);

    assert_eq!(node.sleep_if_idle(&mut power), None);
    assert!(power.modes.is_empty());
    assert!(scheduler.is_pending(events::LETIMER0_UF));
}

#[test]
fn transaction_in_flight_limits_sleep_to_em1() {
    let scheduler = Scheduler::new();
    let arbiter = SleepArbiter::new();
    let channel: SubEventQueue = SubEventQueue::new();
    let clock = SimClock::new(&scheduler);
    let mut node = opened(&scheduler, &arbiter, &channel, &clock);
    let dispatcher = SimNode::dispatcher();
    let mut power = Recorder::default();

    // Nothing answers at this address, so the transaction stays open.
    let stray = Transaction::read(I2cAddress::new(0x10), 0x00, 1);
    node.sensor_mut().bus_mut().start(stray).unwrap();
    assert_eq!(node.sensor().bus().state(), BusState::AwaitAddressAck);
    assert_eq!(arbiter.votes(EnergyMode::Em2), 1);

    assert_eq!(node.poll(&dispatcher, &mut power), Pass::Idle);
    assert_eq!(power.modes, [EnergyMode::Em1]);
}

#[test]
fn dispatcher_covers_every_node_event() {
    assert_eq!(SimNode::dispatcher().registered(), events::ALL);
}
