//! The `RpcTransport` trait: the single request/response primitive.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// The async trait every JSON-RPC endpoint implements.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; resolvers share one transport
/// across concurrent lookups.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
/// Typed calls live on [`RpcTransportExt`].
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the raw response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Return the transport's identifier (URL or name).
    fn url(&self) -> &str;

    /// Id for the next outgoing request.
    fn next_id(&self) -> u64 {
        1
    }

    /// Invoke `method` with ordered `params` and return the untyped result.
    ///
    /// An error envelope from the node surfaces as [`TransportError::Rpc`].
    async fn invoke_value(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        let req = JsonRpcRequest::new(self.next_id(), method, params);
        tracing::trace!(id = %req.id, method, url = self.url(), "rpc request");
        let resp = self.send(req).await?;
        resp.into_result().map_err(TransportError::Rpc)
    }
}

/// Typed convenience calls for any [`RpcTransport`], including trait objects.
#[async_trait]
pub trait RpcTransportExt: RpcTransport {
    /// Invoke `method` and deserialize the result into `T`.
    ///
    /// Use `Option<T>` for methods that answer `null` when nothing is found.
    async fn invoke<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, TransportError> {
        let value = self.invoke_value(method, params).await?;
        serde_json::from_value(value).map_err(TransportError::Deserialization)
    }
}

impl<R: RpcTransport + ?Sized> RpcTransportExt for R {}
