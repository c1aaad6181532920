//! Common error types for HAL operations

use core::fmt;

/// HAL operation errors
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// A bounded wait ran out of spins
    Timeout,
    /// Configuration error
    ConfigurationError,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "operation timeout"),
            Self::ConfigurationError => write!(f, "configuration error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;

/// Halts on an unrecoverable condition.
///
/// Used when the software model of the hardware has diverged from reality
/// (unexpected sub-event, unbalanced energy-mode votes, failed configuration
/// handshake). There is no recovery path; the diagnostic is logged and the
/// panic handler of the target takes over.
#[cold]
#[track_caller]
pub fn fatal(reason: &dyn fmt::Display) -> ! {
    log::error!("fatal: {}", reason);
    panic!("fatal: {}", reason)
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(HalError::Timeout.to_string(), "operation timeout");
        assert_eq!(HalError::ConfigurationError.to_string(), "configuration error");
    }

    #[test]
    #[should_panic(expected = "fatal: operation timeout")]
    fn fatal_panics_with_reason() {
        fatal(&HalError::Timeout);
    }
}
