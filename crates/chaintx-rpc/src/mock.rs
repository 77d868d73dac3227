//! Scripted in-memory transport for tests.
//!
//! Replies are registered per method name and returned for every request to
//! that method. Requests are recorded so tests can count round trips.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::TransportError;
use crate::request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::transport::RpcTransport;

#[derive(Debug, Clone)]
enum Reply {
    Result(Value),
    Remote(JsonRpcError),
    Transport(String),
}

/// A transport that answers from a fixed script.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<JsonRpcRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` with `result`.
    pub fn on(self, method: &str, result: Value) -> Self {
        self.set(method, Reply::Result(result))
    }

    /// Answer `method` with an error envelope.
    pub fn on_error(self, method: &str, code: i64, message: &str) -> Self {
        self.set(
            method,
            Reply::Remote(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        )
    }

    /// Fail `method` as if the connection dropped.
    pub fn on_transport_error(self, method: &str, message: &str) -> Self {
        self.set(method, Reply::Transport(message.into()))
    }

    fn set(self, method: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method.to_string(), reply);
        self
    }

    /// Number of requests sent for `method`.
    pub fn calls(&self, method: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<JsonRpcRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&req.method)
            .cloned();
        let id = req.id.clone();
        let method = req.method.clone();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(req);

        match reply {
            Some(Reply::Result(v)) => Ok(JsonRpcResponse::success(id, v)),
            Some(Reply::Remote(e)) => Ok(JsonRpcResponse::failure(id, e)),
            Some(Reply::Transport(msg)) => Err(TransportError::Http(msg)),
            None => Ok(JsonRpcResponse::failure(
                id,
                JsonRpcError {
                    code: -32601,
                    message: format!("the method {method} does not exist/is not available"),
                    data: None,
                },
            )),
        }
    }

    fn url(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RpcTransportExt;
    use serde_json::json;

    #[tokio::test]
    async fn scripted_replies_and_counts() {
        let t = MockTransport::new()
            .on("eth_chainId", json!("0x1"))
            .on_error("eth_call", 3, "execution reverted")
            .on_transport_error("eth_getBalance", "connection reset");

        let id: String = t.invoke("eth_chainId", vec![]).await.unwrap();
        assert_eq!(id, "0x1");
        assert!(t.invoke::<String>("eth_call", vec![]).await.unwrap_err().is_remote());
        assert!(t.invoke::<String>("eth_getBalance", vec![]).await.unwrap_err().is_transient());
        // Unscripted methods answer like a node that lacks them.
        assert!(t.invoke::<String>("eth_foo", vec![]).await.unwrap_err().is_remote());

        assert_eq!(t.calls("eth_chainId"), 1);
        assert_eq!(t.requests().len(), 4);
    }
}
