#![no_std]
#![forbid(unsafe_code)]

//! # Energy-Mode Arbiter
//!
//! Every peripheral that cannot tolerate a given sleep depth takes a *vote*
//! against that depth before it starts working and returns the vote when it
//! is done. The arbiter keeps one counter per [`EnergyMode`] and derives the
//! deepest mode the processor may enter from the shallowest counter that is
//! still nonzero.
//!
//! All counter updates happen inside a critical section, so votes may be
//! taken and released from interrupt context as well as from the main loop.

use core::cell::RefCell;
use core::fmt;

use critical_section::{CriticalSection, Mutex};
use hal::{fatal, EnergyMode, PowerControl};

/// Default sanity bound on outstanding votes per mode.
///
/// A handful of peripherals exist on the node; reaching this many votes
/// against one mode means some block has no matching unblock.
pub const DEFAULT_VOTE_LIMIT: u8 = 5;

/// Unbalanced block/unblock detected.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepError {
    /// A block would push the counter to the sanity bound.
    Overflow { mode: EnergyMode, limit: u8 },
    /// An unblock found the counter already at zero.
    Underflow { mode: EnergyMode },
}

impl fmt::Display for SleepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow { mode, limit } => {
                write!(f, "{mode} blocked {limit} times, unbalanced block/unblock")
            }
            Self::Underflow { mode } => write!(f, "{mode} unblocked without a matching block"),
        }
    }
}

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl std::error::Error for SleepError {}

/// Per-mode vote counters.
pub struct SleepArbiter {
    votes: Mutex<RefCell<[u8; EnergyMode::COUNT]>>,
    limit: u8,
}

impl SleepArbiter {
    /// Creates an arbiter with no outstanding votes.
    pub const fn new() -> Self {
        Self::with_limit(DEFAULT_VOTE_LIMIT)
    }

    /// Creates an arbiter whose counters are fatal once they would reach `limit`.
    pub const fn with_limit(limit: u8) -> Self {
        Self {
            votes: Mutex::new(RefCell::new([0; EnergyMode::COUNT])),
            limit,
        }
    }

    /// Clears every counter. Call before any peripheral starts.
    pub fn open(&self) {
        critical_section::with(|cs| {
            *self.votes.borrow_ref_mut(cs) = [0; EnergyMode::COUNT];
        });
        log::debug!("sleep arbiter open");
    }

    /// Adds a vote against `mode`, returning the new count.
    pub fn try_block(&self, mode: EnergyMode) -> Result<u8, SleepError> {
        critical_section::with(|cs| {
            let mut votes = self.votes.borrow_ref_mut(cs);
            let count = votes[mode.index()] + 1;
            if count >= self.limit {
                return Err(SleepError::Overflow {
                    mode,
                    limit: self.limit,
                });
            }
            votes[mode.index()] = count;
            Ok(count)
        })
    }

    /// Removes a vote against `mode`, returning the new count.
    pub fn try_unblock(&self, mode: EnergyMode) -> Result<u8, SleepError> {
        critical_section::with(|cs| {
            let mut votes = self.votes.borrow_ref_mut(cs);
            let slot = &mut votes[mode.index()];
            if *slot == 0 {
                return Err(SleepError::Underflow { mode });
            }
            *slot -= 1;
            Ok(*slot)
        })
    }

    /// Forbids `mode` and everything deeper until the matching [`unblock`].
    ///
    /// Halts if the vote count reaches the sanity bound.
    ///
    /// [`unblock`]: Self::unblock
    pub fn block(&self, mode: EnergyMode) {
        match self.try_block(mode) {
            Ok(count) => log::trace!("block {} ({} votes)", mode, count),
            Err(err) => fatal(&err),
        }
    }

    /// Returns a vote taken with [`block`](Self::block).
    ///
    /// Halts if no vote is outstanding for `mode`.
    pub fn unblock(&self, mode: EnergyMode) {
        match self.try_unblock(mode) {
            Ok(count) => log::trace!("unblock {} ({} votes)", mode, count),
            Err(err) => fatal(&err),
        }
    }

    /// Outstanding votes against `mode`.
    pub fn votes(&self, mode: EnergyMode) -> u8 {
        critical_section::with(|cs| self.votes.borrow_ref(cs)[mode.index()])
    }

    /// Shallowest mode with an outstanding vote, or [`EnergyMode::DEEPEST`]
    /// when nothing is blocked.
    pub fn current_block_mode(&self) -> EnergyMode {
        critical_section::with(|cs| self.block_mode_in(cs))
    }

    /// Mode [`enter_sleep`](Self::enter_sleep) would request right now.
    ///
    /// `None` means the core has to stay in EM0.
    pub fn sleep_target(&self) -> Option<EnergyMode> {
        critical_section::with(|cs| Self::target_for(self.block_mode_in(cs)))
    }

    /// Puts the core into the deepest mode every outstanding vote allows.
    ///
    /// The lookup and the transition request happen in one critical section;
    /// a pending interrupt still wakes the core. Returns the mode that was
    /// entered, or `None` when EM0 or EM1 is blocked and the core stayed awake.
    pub fn enter_sleep<P: PowerControl + ?Sized>(&self, power: &mut P) -> Option<EnergyMode> {
        critical_section::with(|cs| {
            let target = Self::target_for(self.block_mode_in(cs));
            if let Some(mode) = target {
                power.enter(mode);
            }
            target
        })
    }

    fn block_mode_in(&self, cs: CriticalSection<'_>) -> EnergyMode {
        let votes = self.votes.borrow_ref(cs);
        votes
            .iter()
            .position(|&count| count != 0)
            .and_then(EnergyMode::from_index)
            .unwrap_or(EnergyMode::DEEPEST)
    }

    fn target_for(blocked: EnergyMode) -> Option<EnergyMode> {
        match blocked {
            EnergyMode::Em0 | EnergyMode::Em1 => None,
            EnergyMode::Em2 => Some(EnergyMode::Em1),
            EnergyMode::Em3 => Some(EnergyMode::Em2),
            EnergyMode::Em4 => Some(EnergyMode::Em3),
        }
    }
}

impl Default for SleepArbiter {
    fn default() -> Self {
        Self::new()
    }
}
