//! I2C (Inter-Integrated Circuit) controller abstraction
//!
//! The control stack sees a bus controller as a small register file: a
//! command register, transmit and receive data registers, an interrupt flag
//! register with a matching enable mask, and a state register that reports
//! whether the controller is idle.

use core::ops::{BitAnd, BitOr, BitOrAssign, Not};

use crate::error::HalResult;

/// 7-bit peripheral address
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Creates an address, discarding anything above bit 6.
    pub const fn new(address: u8) -> Self {
        Self(address & 0x7F)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Address byte with the write direction bit.
    pub const fn write_byte(self) -> u8 {
        self.0 << 1
    }

    /// Address byte with the read direction bit.
    pub const fn read_byte(self) -> u8 {
        (self.0 << 1) | 1
    }
}

/// I2C speed mode
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cSpeed {
    /// Standard mode (100 kHz)
    Standard,
    /// Fast mode (400 kHz)
    Fast,
    /// Fast mode plus (1 MHz)
    FastPlus,
}

impl I2cSpeed {
    pub const fn hz(self) -> u32 {
        match self {
            Self::Standard => 100_000,
            Self::Fast => 400_000,
            Self::FastPlus => 1_000_000,
        }
    }
}

/// SCL low/high period ratio
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockRatio {
    /// 4:4
    Standard,
    /// 6:3
    Asymmetric,
    /// 11:6
    Fast,
}

/// Pin routing for SCL and SDA
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I2cRoute {
    pub scl_location: u8,
    pub sda_location: u8,
    pub scl_enable: bool,
    pub sda_enable: bool,
}

/// Interrupt flag set, laid out like the controller's IF/IEN registers.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IrqFlags(u32);

impl IrqFlags {
    /// Start condition sent
    pub const START: Self = Self(1 << 0);
    /// Received data valid
    pub const RXDATAV: Self = Self(1 << 5);
    /// Acknowledge received
    pub const ACK: Self = Self(1 << 6);
    /// Master stop condition sent
    pub const MSTOP: Self = Self(1 << 8);

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

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for IrqFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for IrqFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for IrqFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for IrqFlags {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// Bits written to the controller's command register.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command(u8);

impl Command {
    pub const START: Self = Self(1 << 0);
    pub const STOP: Self = Self(1 << 1);
    pub const ACK: Self = Self(1 << 2);
    pub const NACK: Self = Self(1 << 3);
    pub const ABORT: Self = Self(1 << 5);
    pub const CLEAR_TX: Self = Self(1 << 6);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Command {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// I2C configuration
#[derive(Debug, Clone)]
pub struct I2cConfig {
    pub speed: I2cSpeed,
    pub clock_ratio: ClockRatio,
    pub master: bool,
    /// Reference clock in Hz, 0 selects the currently configured clock.
    pub ref_freq: u32,
    pub route: I2cRoute,
    /// Sub-event interrupts to enable once the controller is configured.
    pub irqs: IrqFlags,
    /// Upper bound on polls while waiting for the reset stop condition.
    /// `None` waits indefinitely.
    pub reset_spin_limit: Option<u32>,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            speed: I2cSpeed::Standard,
            clock_ratio: ClockRatio::Standard,
            master: true,
            ref_freq: 0,
            route: I2cRoute::default(),
            irqs: IrqFlags::ACK | IrqFlags::RXDATAV | IrqFlags::MSTOP,
            reset_spin_limit: None,
        }
    }
}

impl I2cConfig {
    pub fn builder() -> I2cConfigBuilder {
        I2cConfigBuilder::default()
    }
}

/// Builder for [`I2cConfig`].
#[derive(Debug, Clone, Default)]
pub struct I2cConfigBuilder {
    config: I2cConfig,
}

impl I2cConfigBuilder {
    pub fn speed(mut self, speed: I2cSpeed) -> Self {
        self.config.speed = speed;
        self
    }

    pub fn clock_ratio(mut self, ratio: ClockRatio) -> Self {
        self.config.clock_ratio = ratio;
        self
    }

    pub fn master(mut self, master: bool) -> Self {
        self.config.master = master;
        self
    }

    pub fn ref_freq(mut self, hz: u32) -> Self {
        self.config.ref_freq = hz;
        self
    }

    /// Routes SCL and SDA to the given locations and enables both pins.
    pub fn route(mut self, scl_location: u8, sda_location: u8) -> Self {
        self.config.route = I2cRoute {
            scl_location,
            sda_location,
            scl_enable: true,
            sda_enable: true,
        };
        self
    }

    pub fn irqs(mut self, irqs: IrqFlags) -> Self {
        self.config.irqs = irqs;
        self
    }

    pub fn reset_spin_limit(mut self, spins: u32) -> Self {
        self.config.reset_spin_limit = Some(spins);
        self
    }

    pub fn build(self) -> I2cConfig {
        self.config
    }
}

/// Register-level view of one bus controller.
pub trait I2cController {
    /// Applies clock, routing and master settings.
    fn configure(&mut self, config: &I2cConfig) -> HalResult<()>;

    /// Writes the command register.
    fn command(&mut self, command: Command);

    /// Writes the transmit data register.
    fn write_tx(&mut self, byte: u8);

    /// Reads the receive data register.
    fn read_rx(&mut self) -> u8;

    /// Pending interrupt flags (IF).
    fn flags(&self) -> IrqFlags;

    /// Clears pending interrupt flags (IFC).
    fn clear_flags(&mut self, flags: IrqFlags);

    /// Enabled interrupt sources (IEN).
    fn enabled_irqs(&self) -> IrqFlags;

    fn set_enabled_irqs(&mut self, irqs: IrqFlags);

    /// True when the controller's bus state machine is idle.
    fn is_idle(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_bytes_carry_direction() {
        let addr = I2cAddress::new(0x55);
        assert_eq!(addr.write_byte(), 0xAA);
        assert_eq!(addr.read_byte(), 0xAB);
        assert_eq!(I2cAddress::new(0xD5), addr);
    }

    #[test]
    fn flag_set_operations() {
        let set = IrqFlags::ACK | IrqFlags::MSTOP;
        assert!(set.contains(IrqFlags::ACK));
        assert!(!set.contains(IrqFlags::RXDATAV));
        assert_eq!(set & !IrqFlags::ACK, IrqFlags::MSTOP);
        assert!((set & IrqFlags::START).is_empty());
    }

    #[test]
    fn builder_enables_routed_pins() {
        let config = I2cConfig::builder()
            .speed(I2cSpeed::Fast)
            .route(3, 4)
            .reset_spin_limit(10)
            .build();
        assert_eq!(config.speed.hz(), 400_000);
        assert_eq!(config.route.scl_location, 3);
        assert!(config.route.sda_enable);
        assert_eq!(config.reset_spin_limit, Some(10));
        assert_eq!(config.irqs, IrqFlags::ACK | IrqFlags::RXDATAV | IrqFlags::MSTOP);
    }
}
