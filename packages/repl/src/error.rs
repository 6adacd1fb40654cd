//! Shell errors.

use crate::io::IoError;

/// Errors that end a shell session.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("terminal setup failed: {0}")]
    Terminal(#[from] std::io::Error),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("invalid router configuration: {0}")]
    Router(#[from] navbridge_store::Error),

    #[error("cannot read config file: {0}")]
    Config(String),
}
