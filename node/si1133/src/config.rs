//! Sensor configuration.

use hal::{ClockRatio, I2cAddress, I2cConfig, I2cSpeed, IrqFlags};

pub const DEFAULT_ADDRESS: I2cAddress = I2cAddress::new(0x55);

/// Time the sensor needs after power-up before it answers on the bus.
pub const STARTUP_DELAY_MS: u32 = 25;

/// Route location of SCL on PC5.
const SCL_PC5: u8 = 17;
/// Route location of SDA on PC4.
const SDA_PC4: u8 = 19;

#[derive(Debug, Clone)]
pub struct Si1133Config {
    pub address: I2cAddress,
    pub startup_delay_ms: u32,
    pub bus: I2cConfig,
    /// Bound on polls per setup step. `None` waits indefinitely.
    pub setup_spin_limit: Option<u32>,
}

impl Default for Si1133Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            startup_delay_ms: STARTUP_DELAY_MS,
            bus: I2cConfig::builder()
                .speed(I2cSpeed::Fast)
                .clock_ratio(ClockRatio::Asymmetric)
                .master(true)
                .ref_freq(0)
                .route(SCL_PC5, SDA_PC4)
                .irqs(IrqFlags::ACK | IrqFlags::RXDATAV | IrqFlags::MSTOP)
                .build(),
            setup_spin_limit: None,
        }
    }
}

impl Si1133Config {
    pub fn builder() -> Si1133ConfigBuilder {
        Si1133ConfigBuilder::default()
    }
}

/// Builder for [`Si1133Config`].
#[derive(Debug, Clone, Default)]
pub struct Si1133ConfigBuilder {
    config: Si1133Config,
}

impl Si1133ConfigBuilder {
    pub fn address(mut self, address: I2cAddress) -> Self {
        self.config.address = address;
        self
    }

    pub fn startup_delay_ms(mut self, ms: u32) -> Self {
        self.config.startup_delay_ms = ms;
        self
    }

    pub fn bus(mut self, bus: I2cConfig) -> Self {
        self.config.bus = bus;
        self
    }

    /// Bounds every setup-phase wait, including the bus reset.
    pub fn setup_spin_limit(mut self, spins: u32) -> Self {
        self.config.setup_spin_limit = Some(spins);
        self.config.bus.reset_spin_limit = Some(spins);
        self
    }

    pub fn build(self) -> Si1133Config {
        self.config
    }
}
