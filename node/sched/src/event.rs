//! Event identifiers and pending sets.

use core::fmt;

/// One bit of the pending mask.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u8);

impl EventId {
    /// Number of distinct events the mask can hold.
    pub const CAPACITY: u8 = 32;

    /// Creates the event occupying `bit`.
    ///
    /// # Panics
    ///
    /// Panics if `bit` does not fit the 32-bit mask; in a `const` this is a
    /// compile error.
    pub const fn new(bit: u8) -> Self {
        assert!(bit < Self::CAPACITY, "event bit out of range");
        Self(bit)
    }

    pub const fn bit(self) -> u8 {
        self.0
    }

    pub const fn mask(self) -> u32 {
        1 << self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EVT({})", self.0)
    }
}

/// Snapshot of pending events.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventSet(u32);

impl EventSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, id: EventId) -> bool {
        self.0 & id.mask() != 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[must_use]
    pub const fn with(self, id: EventId) -> Self {
        Self(self.0 | id.mask())
    }

    #[must_use]
    pub const fn without(self, id: EventId) -> Self {
        Self(self.0 & !id.mask())
    }

    /// Pending events, lowest bit first.
    pub fn iter(self) -> impl Iterator<Item = EventId> {
        (0..EventId::CAPACITY)
            .filter(move |bit| self.0 & (1u32 << *bit) != 0)
            .map(EventId)
    }
}

impl From<EventId> for EventSet {
    fn from(id: EventId) -> Self {
        Self(id.mask())
    }
}

impl fmt::Display for EventSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_operations() {
        let a = EventId::new(0);
        let b = EventId::new(5);
        let set = EventSet::empty().with(a).with(b);

        assert!(set.contains(a));
        assert!(set.contains(b));
        assert_eq!(set.len(), 2);
        assert_eq!(set.bits(), 0b10_0001);
        assert!(!set.without(a).contains(a));
    }

    #[test]
    fn iter_is_ascending() {
        let set = EventSet::from_bits(0x8000_0011);
        let mut ids = set.iter();
        assert_eq!(ids.next(), Some(EventId::new(0)));
        assert_eq!(ids.next(), Some(EventId::new(4)));
        assert_eq!(ids.next(), Some(EventId::new(31)));
        assert_eq!(ids.next(), None);
    }

    #[test]
    #[should_panic(expected = "event bit out of range")]
    fn bit_outside_mask() {
        let _ = EventId::new(32);
    }
}
