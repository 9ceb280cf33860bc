use rotalog_core::ConfigError;
use thiserror::Error;

/// Failure while building or installing a [`Logger`](crate::Logger).
#[derive(Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unable to prepare log folder: {0}")]
    Io(#[from] std::io::Error),

    #[error("a global logger is already installed: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}
