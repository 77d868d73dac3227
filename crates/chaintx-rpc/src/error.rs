//! Transport-level error types.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors that can occur while invoking a remote JSON-RPC method.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, bad status, broken body).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The node answered with an error envelope instead of a result.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The result could not be deserialized into the requested type.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if the node returned an error envelope.
    ///
    /// Remote errors mean "not resolvable now" and are usually absorbed by
    /// the resolvers; everything else is a transport failure.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }

    /// Returns the remote error envelope, if this is one.
    pub fn as_remote(&self) -> Option<&JsonRpcError> {
        match self {
            Self::Rpc(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }
}
