//! Host log output: a `tracing` fmt subscriber with the `log` bridge, so
//! records from the `log`-based core crates reach the console.

use tracing_subscriber::EnvFilter;

use crate::error::PortError;

/// Environment variable holding the filter directives, e.g.
/// `NODE_LOG=info,node_i2c=debug`.
pub const LOG_ENV: &str = "NODE_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Builds the filter from `directives`, falling back to `info` when unset.
pub fn log_filter(directives: Option<&str>) -> Result<EnvFilter, PortError> {
    let directives = directives.unwrap_or(DEFAULT_DIRECTIVES);
    EnvFilter::try_new(directives).map_err(|err| PortError::LogFilter {
        directives: directives.to_owned(),
        reason: err.to_string(),
    })
}

/// Installs the subscriber with the filter named by [`LOG_ENV`].
pub fn init_logger() -> Result<(), PortError> {
    let directives = std::env::var(LOG_ENV).ok();
    let filter = log_filter(directives.as_deref())?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| PortError::Logger(err.to_string()))
}
