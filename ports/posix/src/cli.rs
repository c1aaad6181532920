//! Command line of the `light-node` binary.

use clap::Parser;

/// Runs the light node against the simulated SI1133.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "light-node", version, about = "Runs the light node against a simulated SI1133")]
pub struct Args {
    /// Sleep/wake cycles to run; 0 runs until Ctrl-C.
    #[arg(default_value_t = 10, value_name = "SLEEPS")]
    pub sleeps: u32,

    /// Wait out the simulated time between timer edges.
    #[arg(long)]
    pub realtime: bool,
}

impl Args {
    /// Sleep bound handed to the runtime, `None` for unbounded.
    pub fn sleep_limit(&self) -> Option<u32> {
        (self.sleeps > 0).then_some(self.sleeps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["light-node"]).unwrap();
        assert_eq!(args.sleeps, 10);
        assert!(!args.realtime);
        assert_eq!(args.sleep_limit(), Some(10));
    }

    #[test]
    fn sleeps_and_realtime() {
        let args = Args::try_parse_from(["light-node", "3", "--realtime"]).unwrap();
        assert_eq!(args, Args { sleeps: 3, realtime: true });
    }

    #[test]
    fn zero_is_unbounded() {
        let args = Args::try_parse_from(["light-node", "0"]).unwrap();
        assert_eq!(args.sleep_limit(), None);
    }

    #[test]
    fn help_is_not_a_count() {
        let err = Args::try_parse_from(["light-node", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn bad_count_rejected() {
        let err = Args::try_parse_from(["light-node", "lots"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
