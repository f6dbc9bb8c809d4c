use nova_core::error::NovaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Nova(#[from] NovaError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
