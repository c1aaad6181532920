//! Runs the light node against the simulated sensor.
//!
//! See `light-node --help` for the options.

use std::process::ExitCode;

use clap::Parser;
use hal::EnergyMode;
use node_app::{Node, NodeConfig, Peripherals};
use node_i2c::{BusId, I2cBus, SubEventQueue};
use node_posix::{
    init_logger, Args, ConsoleLed, ConsoleRadio, PortError, PosixRuntime, Si1133Model, SimClock,
    SimDelay, SimI2c, SimNode, SimPower, SimTimer,
};
use node_sched::Scheduler;
use node_sleep::SleepArbiter;

/// Light levels handed out by successive measurements.
const READINGS: [u16; 6] = [4, 12, 35, 250, 19, 20];

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("light-node: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), PortError> {
    let args = Args::parse();
    init_logger()?;

    let scheduler = Scheduler::new();
    let arbiter = SleepArbiter::new();
    let channel: SubEventQueue = SubEventQueue::new();
    let clock = SimClock::new(&scheduler).realtime(args.realtime);

    let controller = SimI2c::new(&channel, Si1133Model::new().with_readings(READINGS));
    let bus = I2cBus::new(BusId::I2c1, controller, &channel, &scheduler, &arbiter);
    let peripherals = Peripherals {
        led: ConsoleLed::default(),
        radio: ConsoleRadio::new(&scheduler).echo(true),
        timer: SimTimer::new(&clock),
    };
    let mut node: SimNode<'_> = Node::new(bus, peripherals, &scheduler, &arbiter, NodeConfig::default());
    let dispatcher = SimNode::dispatcher();
    let mut power = SimPower::new(&clock);
    let mut delay = SimDelay::new(args.realtime);

    node.open(&mut delay);

    let runtime = PosixRuntime::new();
    let handle = runtime.stop_handle();
    ctrlc::set_handler(move || handle.stop())?;

    let stats = runtime.run(&mut node, &dispatcher, &mut power, args.sleep_limit());

    log::info!(
        "simulated {:?}: {} sleeps in EM2, {} in EM1, {} messages sent",
        clock.now(),
        power.entered(EnergyMode::Em2),
        power.entered(EnergyMode::Em1),
        node.peripherals().radio.sent().len()
    );
    log::debug!("{:?}", stats);
    Ok(())
}
