//! Energy-mode (sleep depth) abstraction

use core::fmt;

/// Processor energy modes, shallowest first.
///
/// `Em0` is the running state. Each deeper mode gates more clocks; a
/// peripheral that needs a clock forbids every mode from the one that stops
/// it downwards.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum EnergyMode {
    Em0 = 0,
    Em1 = 1,
    Em2 = 2,
    Em3 = 3,
    Em4 = 4,
}

impl EnergyMode {
    pub const COUNT: usize = 5;

    pub const ALL: [EnergyMode; Self::COUNT] = [
        EnergyMode::Em0,
        EnergyMode::Em1,
        EnergyMode::Em2,
        EnergyMode::Em3,
        EnergyMode::Em4,
    ];

    /// Deepest mode the processor supports.
    pub const DEEPEST: EnergyMode = EnergyMode::Em4;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Em0),
            1 => Some(Self::Em1),
            2 => Some(Self::Em2),
            3 => Some(Self::Em3),
            4 => Some(Self::Em4),
            _ => None,
        }
    }
}

impl fmt::Display for EnergyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EM{}", self.index())
    }
}

/// Issues low-power transitions.
pub trait PowerControl {
    /// Enters `mode` and returns once an interrupt wakes the core.
    fn enter(&mut self, mode: EnergyMode);
}
