//! Register map, commands and parameter values.

/// Command response; the low nibble is the command counter.
pub const RESPONSE0: u8 = 0x11;
/// Parameter value staged for the next `PARAM_SET`.
pub const INPUT0: u8 = 0x0A;
pub const COMMAND: u8 = 0x0B;
/// First result byte. Results are big-endian across `HOSTOUT0..`.
pub const HOSTOUT0: u8 = 0x13;
pub const HOSTOUT1: u8 = 0x14;
pub const HOSTOUT2: u8 = 0x15;

/// Low nibble of `RESPONSE0`.
pub const COUNTER_MASK: u8 = 0x0F;

pub mod cmd {
    pub const RESET_CMD_CTR: u8 = 0x00;
    pub const FORCE: u8 = 0x11;
    /// OR-ed with a parameter address.
    pub const PARAM_SET: u8 = 0x80;
}

pub mod param {
    pub const CHAN_LIST: u8 = 0x01;
    pub const ADCCONFIG0: u8 = 0x02;
}

/// ADC multiplexer selection for the white photodiode group.
pub const WHITE_LIGHT: u8 = 0b01011;
/// Channel list with only channel 0 enabled.
pub const CHANNEL0: u8 = 0b1;

/// Counter value expected after `steps` acknowledged commands.
pub const fn counter_after(start: u8, steps: u8) -> u8 {
    start.wrapping_add(steps) & COUNTER_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_wraps_in_four_bits() {
        assert_eq!(counter_after(0, 1), 1);
        assert_eq!(counter_after(14, 2), 0);
        assert_eq!(counter_after(15, 1), 0);
    }

    #[test]
    fn param_set_encodes_address() {
        assert_eq!(cmd::PARAM_SET | param::ADCCONFIG0, 0x82);
        assert_eq!(cmd::PARAM_SET | param::CHAN_LIST, 0x81);
    }
}
