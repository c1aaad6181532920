//! Hardware Abstraction Layer (HAL) for the light node
//!
//! This crate describes the hardware boundary the control stack talks to: the
//! register interface of a two-wire bus controller and the processor's
//! energy-mode controller. Vendor crates implement the traits; the host port
//! implements them with simulated peripherals.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod i2c;
pub mod power;

// Re-export commonly used types
pub use error::{fatal, HalError, HalResult};
pub use i2c::{
    ClockRatio, Command, I2cAddress, I2cConfig, I2cConfigBuilder, I2cController, I2cRoute, I2cSpeed,
    IrqFlags,
};
pub use power::{EnergyMode, PowerControl};
