//! Scheduler event ids used by the node.

use node_sched::{EventId, EventSet};

pub const LETIMER0_COMP0: EventId = EventId::new(0);
/// Start of the active window: trigger a measurement.
pub const LETIMER0_COMP1: EventId = EventId::new(1);
/// End of the period: fetch the measurement.
pub const LETIMER0_UF: EventId = EventId::new(2);
/// White-light result is ready.
pub const SI1133_LIGHT: EventId = EventId::new(3);
pub const BOOT_UP: EventId = EventId::new(4);
pub const RADIO_TX_DONE: EventId = EventId::new(5);

pub const ALL: EventSet = EventSet::empty()
    .with(LETIMER0_COMP0)
    .with(LETIMER0_COMP1)
    .with(LETIMER0_UF)
    .with(SI1133_LIGHT)
    .with(BOOT_UP)
    .with(RADIO_TX_DONE);
