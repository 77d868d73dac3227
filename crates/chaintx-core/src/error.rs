//! Error types shared by every platform service.

use thiserror::Error;

use crate::contract::Platform;

/// Errors a transaction or balance lookup can surface to its caller.
///
/// Unknown call selectors are not errors: the input decoder returns a
/// zero-valued best-effort result for them instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Connectivity or timeout failure talking to the data source.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The data source answered with an error envelope.
    #[error("Remote error {code}: {message}")]
    Remote { code: i64, message: String },

    /// Returned bytes do not match the declared output shape.
    #[error("ABI decode failed: {reason}")]
    Decode { reason: String },

    /// An address argument could not be parsed for the target platform.
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A contract from another platform was passed to this service.
    #[error("{contract} is not a {platform} contract")]
    UnsupportedContract { contract: String, platform: Platform },

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    /// Returns `true` for a remote error envelope.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Returns `true` for connectivity or timeout failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode { reason: reason.into() }
    }
}
