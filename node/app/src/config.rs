//! Node configuration.

use core::time::Duration;

use hal::EnergyMode;
use node_si1133::Si1133Config;

/// White-light readings below this count as dark.
pub const DARK_THRESHOLD: u32 = 20;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Measurement period.
    pub pwm_period: Duration,
    /// Length of the active window at the start of each period.
    pub active_period: Duration,
    pub dark_threshold: u32,
    /// Held for the node's whole lifetime.
    pub system_block: EnergyMode,
    pub boot_message: &'static str,
    pub sensor: Si1133Config,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            pwm_period: Duration::from_millis(2000),
            active_period: Duration::from_millis(2),
            dark_threshold: DARK_THRESHOLD,
            system_block: EnergyMode::Em3,
            boot_message: "This is a test ;)",
            sensor: Si1133Config::default(),
        }
    }
}

impl NodeConfig {
    pub fn builder() -> NodeConfigBuilder {
        NodeConfigBuilder::default()
    }
}

/// Builder for [`NodeConfig`].
#[derive(Debug, Clone, Default)]
pub struct NodeConfigBuilder {
    config: NodeConfig,
}

impl NodeConfigBuilder {
    pub fn pwm_period(mut self, period: Duration) -> Self {
        self.config.pwm_period = period;
        self
    }

    pub fn active_period(mut self, active: Duration) -> Self {
        self.config.active_period = active;
        self
    }

    pub fn dark_threshold(mut self, threshold: u32) -> Self {
        self.config.dark_threshold = threshold;
        self
    }

    pub fn system_block(mut self, mode: EnergyMode) -> Self {
        self.config.system_block = mode;
        self
    }

    pub fn boot_message(mut self, message: &'static str) -> Self {
        self.config.boot_message = message;
        self
    }

    pub fn sensor(mut self, sensor: Si1133Config) -> Self {
        self.config.sensor = sensor;
        self
    }

    pub fn build(self) -> NodeConfig {
        self.config
    }
}
