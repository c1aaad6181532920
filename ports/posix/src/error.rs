use thiserror::Error;

/// Errors raised by the host port itself.
#[derive(Error, Debug)]
pub enum PortError {
    #[error("invalid log filter {directives:?}: {reason}")]
    LogFilter { directives: String, reason: String },
    #[error("cannot install logger: {0}")]
    Logger(String),
    #[error("cannot install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
