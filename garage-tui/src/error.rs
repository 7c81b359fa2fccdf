//! Error types for the TUI.

use crate::config::ConfigError;
use crate::persistence::PersistenceError;
use garage_client::{ClientError, CredentialError};

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type TuiResult<T> = Result<T, TuiError>;
