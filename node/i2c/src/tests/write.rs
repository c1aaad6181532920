use hal::{Command, EnergyMode, I2cAddress};
use node_sched::{EventId, Scheduler};
use node_sleep::SleepArbiter;

use super::{MockController, Op};
use crate::{BusId, BusState, I2cBus, SubEvent, SubEventQueue, Transaction};

const SENSOR: I2cAddress = I2cAddress::new(0x55);

#[test]
fn single_byte_write_reaches_await_stop() {
    let scheduler = Scheduler::new();
    let arbiter = SleepArbiter::new();
    let channel: SubEventQueue = SubEventQueue::new();
    let mut bus = I2cBus::new(BusId::I2c1, MockController::default(), &channel, &scheduler, &arbiter);

    bus.start(Transaction::write(SENSOR, 0x0B, 1, 0x11)).unwrap();

    bus.handle(SubEvent::AddressAcknowledged).unwrap();
    assert_eq!(bus.state(), BusState::WritingData);

    bus.handle(SubEvent::AddressAcknowledged).unwrap();
    assert_eq!(bus.state(), BusState::AwaitStop);
    assert_eq!(bus.remaining(), 0);
    assert_eq!(
        bus.controller().ops,
        [
            Op::Command(Command::START),
            Op::Tx(0xAA),
            Op::Tx(0x0B),
            Op::Tx(0x11),
            Op::Command(Command::STOP),
        ]
    );
    assert_eq!(arbiter.votes(EnergyMode::Em2), 1);

    // Acknowledge of the data byte trails the stop request.
    bus.handle(SubEvent::AddressAcknowledged).unwrap();
    bus.handle(SubEvent::StopConditionObserved).unwrap();
    assert!(bus.is_available());
    assert_eq!(arbiter.votes(EnergyMode::Em2), 0);
}

#[test]
fn multi_byte_write_sends_most_significant_first() {
    let scheduler = Scheduler::new();
    let arbiter = SleepArbiter::new();
    let channel: SubEventQueue = SubEventQueue::new();
    let mut bus = I2cBus::new(BusId::I2c0, MockController::default(), &channel, &scheduler, &arbiter);
    let done = EventId::new(5);

    bus.start(Transaction::write(SENSOR, 0x0A, 3, 0x00_12_34_56).notify(done))
        .unwrap();
    for _ in 0..4 {
        channel.push(SubEvent::AddressAcknowledged);
    }
    channel.push(SubEvent::StopConditionObserved);
    bus.service();

    let sent: std::vec::Vec<u8> = bus
        .controller()
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Tx(byte) => Some(*byte),
            Op::Command(_) => None,
        })
        .collect();
    assert_eq!(sent, [0xAA, 0x0A, 0x12, 0x34, 0x56]);
    assert!(scheduler.is_pending(done));
    assert!(bus.is_available());
    // Writes leave the last read result alone.
    assert_eq!(bus.last_read(), 0);
}
