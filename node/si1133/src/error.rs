use core::fmt;

use hal::HalError;
use node_i2c::BusError;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Si1133Error {
    Hal(HalError),
    Bus(BusError),
    /// A parameter write was not acknowledged by the sensor's command
    /// counter.
    CommandCounter { param: u8, expected: u8, found: u8 },
}

impl fmt::Display for Si1133Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hal(err) => write!(f, "si1133: {err}"),
            Self::Bus(err) => write!(f, "si1133: {err}"),
            Self::CommandCounter {
                param,
                expected,
                found,
            } => write!(
                f,
                "si1133: parameter {param:#04x} not applied, command counter {found} expected {expected}"
            ),
        }
    }
}

impl From<HalError> for Si1133Error {
    fn from(err: HalError) -> Self {
        Self::Hal(err)
    }
}

impl From<BusError> for Si1133Error {
    fn from(err: BusError) -> Self {
        Self::Bus(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Si1133Error {}
