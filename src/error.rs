use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Every failure is terminal for the running command: nothing is printed on
/// stdout once one of these is returned.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required parameter is missing or invalid. Raised before any key work.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Key bytes could not be parsed into a supported public key.
    #[error("malformed key: {0}")]
    KeyFormat(String),

    /// The signer rejected the private key or the payload.
    #[error("signing failed: {0}")]
    Signing(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }
}
