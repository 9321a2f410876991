use thiserror::Error;

/// Errors surfaced at the CLI/HTTP boundary. Wraps [`wfsk_core::ModemError`]
/// alongside the I/O and configuration failures that only make sense
/// outside the core library.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Modem(#[from] wfsk_core::ModemError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("message text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
